//! Plain-text diagnostic reports.
//!
//! A [`Report`] is built up section by section and handed back to the caller,
//! which decides where it goes (log, terminal or file).

use std::fmt;
use std::fs;
use std::path::Path;

use crate::core::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub heading: String,
    pub lines: Vec<String>,
}

/// Titled list of sections rendered as text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Start a new section; following [`Report::line`] calls append to it
    pub fn section(&mut self, heading: impl Into<String>) -> &mut Self {
        self.sections.push(Section {
            heading: heading.into(),
            lines: Vec::new(),
        });
        self
    }

    pub fn line(&mut self, line: impl Into<String>) -> &mut Self {
        if self.sections.is_empty() {
            self.sections.push(Section::default());
        }
        if let Some(section) = self.sections.last_mut() {
            section.lines.push(line.into());
        }
        self
    }

    pub fn write_to_path(&self, path: &Path) -> PipelineResult<()> {
        fs::write(path, self.to_string()).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "-".repeat(30))?;
        for section in &self.sections {
            writeln!(f)?;
            if !section.heading.is_empty() {
                writeln!(f, "{}:", section.heading)?;
            }
            for line in &section.lines {
                writeln!(f, "   {}", line)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_report_renders_sections_in_order() {
        let mut report = Report::new("Inspecting bordeaux_data.csv");
        report
            .section("Shape")
            .line("(10, 3)")
            .section("Nature Mutation")
            .line("Vente: 8")
            .line("Échange: 2");

        let text = report.to_string();
        let shape = text.find("Shape:").unwrap();
        let nature = text.find("Nature Mutation:").unwrap();
        assert!(shape < nature);
        assert!(text.contains("   Vente: 8\n"));
        assert!(text.starts_with("Inspecting bordeaux_data.csv\n"));
    }

    #[test]
    fn test_line_without_section_goes_to_untitled_section() {
        let mut report = Report::new("t");
        report.line("orphan");
        assert_eq!(report.sections.len(), 1);
        assert!(report.to_string().contains("   orphan"));
    }

    #[test]
    fn test_write_to_path() {
        let mut report = Report::new("Inspection");
        report.section("Shape").line("(1, 1)");

        let file = NamedTempFile::new().unwrap();
        report.write_to_path(file.path()).unwrap();
        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(written, report.to_string());
    }
}
