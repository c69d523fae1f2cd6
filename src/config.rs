use std::path::PathBuf;

use crate::record::Field;
use crate::sort::Algorithm;

/// Session and front-end settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV to load at startup, if any.
    pub csv_path: Option<PathBuf>,
    /// File offered for loading when no path is given.
    pub default_csv: PathBuf,
    /// Records shown after each sort.
    pub preview: usize,
    /// Sort used for every field except the subscription date.
    pub sort: Algorithm,
    /// Sort used for the subscription date.
    pub date_sort: Algorithm,
    /// Column the load-time tree is keyed on.
    pub primary_key: Field,
}

impl Config {
    /// The algorithm the menu uses when ordering by `field`.
    pub fn algorithm_for(&self, field: Field) -> Algorithm {
        if field == Field::SubscriptionDate {
            return self.date_sort;
        }
        return self.sort;
    }
}

impl Default for Config {
    fn default() -> Self {
        return Config {
            csv_path: None,
            default_csv: PathBuf::from("BusinessData.csv"),
            preview: 10,
            sort: Algorithm::Merge,
            date_sort: Algorithm::Quick,
            primary_key: Field::CustomerId,
        };
    }
}
