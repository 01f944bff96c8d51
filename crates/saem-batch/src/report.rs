use saem_types::SenseRecord;

/// Aggregate outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successfully extracted records, in completion order.
    pub records: Vec<SenseRecord>,
    /// Identifiers whose documents carried no entry.
    pub blank: Vec<String>,
    /// Identifiers whose documents could not be retrieved.
    pub network: Vec<String>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.records.len() + self.blank.len() + self.network.len()
    }

    /// Fraction of identifiers that produced a record; 0 for an empty run.
    pub fn ratio(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.records.len() as f64 / self.total() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_of_empty_report_is_zero() {
        assert_eq!(BatchReport::default().ratio(), 0.0);
    }

    #[test]
    fn ratio_counts_successes_over_everything() {
        let report = BatchReport {
            records: vec![SenseRecord::default(); 3],
            blank: vec!["8".to_string()],
            network: vec![],
        };
        assert_eq!(report.total(), 4);
        assert_eq!(report.ratio(), 0.75);
    }
}
