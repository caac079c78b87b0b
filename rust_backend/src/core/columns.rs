//! Column names of the DVF (demandes de valeurs foncières) open dataset.

pub const ID_MUTATION: &str = "id_mutation";
pub const DATE_MUTATION: &str = "date_mutation";
pub const NATURE_MUTATION: &str = "nature_mutation";
pub const VALEUR_FONCIERE: &str = "valeur_fonciere";
pub const TYPE_LOCAL: &str = "type_local";
pub const CODE_POSTAL: &str = "code_postal";
pub const CODE_COMMUNE: &str = "code_commune";
pub const NOM_COMMUNE: &str = "nom_commune";
pub const SURFACE_REELLE_BATI: &str = "surface_reelle_bati";
pub const NOMBRE_PIECES_PRINCIPALES: &str = "nombre_pieces_principales";
pub const SURFACE_TERRAIN: &str = "surface_terrain";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

/// Derived price per square metre.
pub const PRIX_M2: &str = "prix_m2";

/// Columns the cleaning pipeline cannot run without.
pub const REQUIRED: [&str; 4] = [ID_MUTATION, NATURE_MUTATION, TYPE_LOCAL, VALEUR_FONCIERE];

/// Column order of the cleaned output file.
pub const OUTPUT_ORDER: [&str; 11] = [
    ID_MUTATION,
    DATE_MUTATION,
    VALEUR_FONCIERE,
    TYPE_LOCAL,
    CODE_POSTAL,
    NOM_COMMUNE,
    SURFACE_REELLE_BATI,
    NOMBRE_PIECES_PRINCIPALES,
    LATITUDE,
    LONGITUDE,
    PRIX_M2,
];
