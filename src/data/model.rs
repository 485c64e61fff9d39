use std::collections::BTreeSet;
use std::fmt;

use super::filter::FilterOptions;

// ---------------------------------------------------------------------------
// Column – the source columns the dashboard understands
// ---------------------------------------------------------------------------

/// A required column of the survey file, keyed by its header in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Year,
    Seniority,
    ContractType,
    CompanySize,
    Role,
    RemoteType,
    ResidenceIso3,
    SalaryUsd,
}

impl Column {
    /// All required columns, in the order the detail table shows them.
    pub const ALL: [Column; 8] = [
        Column::Year,
        Column::Seniority,
        Column::ContractType,
        Column::CompanySize,
        Column::Role,
        Column::RemoteType,
        Column::ResidenceIso3,
        Column::SalaryUsd,
    ];

    /// Header name in the source file.
    pub fn source_name(self) -> &'static str {
        match self {
            Column::Year => "ano",
            Column::Seniority => "senioridade",
            Column::ContractType => "contrato",
            Column::CompanySize => "tamanho_empresa",
            Column::Role => "cargo",
            Column::RemoteType => "remoto",
            Column::ResidenceIso3 => "residencia_iso3",
            Column::SalaryUsd => "usd",
        }
    }

    /// Human-readable label for headers and widgets.
    pub fn label(self) -> &'static str {
        match self {
            Column::Year => "Year",
            Column::Seniority => "Seniority",
            Column::ContractType => "Contract type",
            Column::CompanySize => "Company size",
            Column::Role => "Role",
            Column::RemoteType => "Work arrangement",
            Column::ResidenceIso3 => "Residence (ISO-3)",
            Column::SalaryUsd => "Salary (USD)",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source_name())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the survey
// ---------------------------------------------------------------------------

/// A single salary-survey response.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub year: i32,
    pub seniority: String,
    pub contract_type: String,
    pub company_size: String,
    pub role: String,
    pub remote_type: String,
    /// ISO-3 country code of residence.
    pub residence_country_code: String,
    /// Annual salary in USD, never negative.
    pub salary_usd: f64,
}

impl Record {
    /// Render one cell for the detail table.
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Year => self.year.to_string(),
            Column::Seniority => self.seniority.clone(),
            Column::ContractType => self.contract_type.clone(),
            Column::CompanySize => self.company_size.clone(),
            Column::Role => self.role.clone(),
            Column::RemoteType => self.remote_type.clone(),
            Column::ResidenceIso3 => self.residence_country_code.clone(),
            Column::SalaryUsd => format!("{:.0}", self.salary_usd),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded survey
// ---------------------------------------------------------------------------

/// The full parsed survey with pre-computed filter options.
///
/// Built once at startup and never mutated afterwards; sessions share it
/// behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records, in source order.
    pub records: Vec<Record>,
    /// Sorted distinct values of the four filterable columns.
    pub options: FilterOptions,
}

impl Dataset {
    /// Build the distinct-value index from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let options = FilterOptions::from_records(&records);
        Dataset { records, options }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct roles, used to pick the mapped role.
    pub fn roles(&self) -> Vec<&str> {
        self.distinct(|r| &r.role)
    }

    /// Sorted distinct work arrangements.
    pub fn remote_types(&self) -> Vec<&str> {
        self.distinct(|r| &r.remote_type)
    }

    fn distinct<'a>(&'a self, key: impl Fn(&'a Record) -> &'a String) -> Vec<&'a str> {
        let values: BTreeSet<&str> = self.records.iter().map(|r| key(r).as_str()).collect();
        values.into_iter().collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Record;

    pub fn record(year: i32, seniority: &str, role: &str, usd: f64) -> Record {
        Record {
            year,
            seniority: seniority.to_string(),
            contract_type: "Full-time".to_string(),
            company_size: "Medium".to_string(),
            role: role.to_string(),
            remote_type: "Remote".to_string(),
            residence_country_code: "USA".to_string(),
            salary_usd: usd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    #[test]
    fn test_from_records_indexes_options() {
        let ds = Dataset::from_records(vec![
            record(2022, "Senior", "Data Engineer", 100.0),
            record(2021, "Junior", "Analyst", 50.0),
            record(2022, "Junior", "Analyst", 60.0),
        ]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.options.years.iter().copied().collect::<Vec<_>>(), vec![2021, 2022]);
        assert_eq!(
            ds.options.seniorities.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["Junior", "Senior"]
        );
        assert_eq!(ds.roles(), vec!["Analyst", "Data Engineer"]);
    }

    #[test]
    fn test_cell_formats_salary_without_decimals() {
        let r = record(2023, "Senior", "Data Scientist", 123456.7);
        assert_eq!(r.cell(Column::SalaryUsd), "123457");
        assert_eq!(r.cell(Column::Year), "2023");
        assert_eq!(Column::SalaryUsd.source_name(), "usd");
    }
}
