#[cfg(test)]
mod tests {
    use crate::config::LocalitySettings;
    use crate::core::error::{PipelineError, Stage};
    use crate::io::loaders::{DvfLoader, LocalityMatch};
    use polars::prelude::*;
    use std::io::Write;
    use std::path::Path;
    use tempfile::{Builder, NamedTempFile};

    const RAW_DEPARTMENT: &str = "\
id_mutation,date_mutation,nature_mutation,valeur_fonciere,code_postal,code_commune,nom_commune,type_local,surface_reelle_bati
2023-1,2023-01-05,Vente,300000,33000,33063,Bordeaux,Maison,80
2023-1,2023-01-05,Vente,300000,33000,33063,Bordeaux,Maison,20
2023-2,2023-02-11,Vente,180000,33700,33281,Mérignac,Appartement,45
2023-3,2023-02-12,Echange,90000,33300,33063,Bordeaux,Appartement,30
2023-4,2023-03-01,Vente,250000,33400,33522,Talence,Maison,90
";

    /// Helper to create a temp CSV file with a .csv extension
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_load_from_file() {
        let temp_file = create_temp_csv(RAW_DEPARTMENT);
        let result = DvfLoader::load_from_file(temp_file.path()).unwrap();

        assert_eq!(result.num_rows, 5);
        assert_eq!(result.num_columns, 9);
        assert_eq!(result.dataframe.height(), 5);
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let result = DvfLoader::load_from_file(Path::new("33.parquet"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unsupported file format"));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let result = DvfLoader::load_from_file(Path::new("/nonexistent/33.csv"));
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("33.csv"), "{}", message);
    }

    #[test]
    fn test_extract_then_save_round_trip() {
        let temp_file = create_temp_csv(RAW_DEPARTMENT);
        let raw = DvfLoader::load_from_file(temp_file.path()).unwrap();

        assert_eq!(
            DvfLoader::locality_match(&raw.dataframe).unwrap(),
            LocalityMatch::CommuneCode
        );
        let mut local =
            DvfLoader::extract_locality(&raw.dataframe, &LocalitySettings::default()).unwrap();
        assert_eq!(local.height(), 3);

        let out = Builder::new().suffix(".csv").tempfile().unwrap();
        DvfLoader::save_csv(&mut local, out.path()).unwrap();

        let reloaded = DvfLoader::load_from_file(out.path()).unwrap();
        assert_eq!(reloaded.num_rows, 3);
        let codes = reloaded.dataframe.column("code_commune").unwrap().str().unwrap();
        assert!(codes.into_iter().all(|c| c == Some("33063")));
    }

    #[test]
    fn test_extract_unknown_commune_is_empty_result() {
        let temp_file = create_temp_csv(RAW_DEPARTMENT);
        let raw = DvfLoader::load_from_file(temp_file.path()).unwrap();

        let settings = LocalitySettings {
            commune_code: "75056".to_string(),
            commune_name: "PARIS".to_string(),
        };
        let err = DvfLoader::extract_locality(&raw.dataframe, &settings).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::EmptyResult {
                stage: Stage::LocalityFilter
            }
        ));
    }

    #[test]
    fn test_extract_without_commune_columns_is_schema_error() {
        let df = df!("valeur_fonciere" => &[1.0]).unwrap();
        let err = DvfLoader::extract_locality(&df, &LocalitySettings::default()).unwrap_err();
        match err {
            PipelineError::Schema { stage, missing } => {
                assert_eq!(stage, Stage::LocalityFilter);
                assert_eq!(missing.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
