//! Customer records and typed field access.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::Error;
use crate::key::{IntoKey, Key};

/// Date layouts accepted for the subscription date, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// One customer row. Immutable once built; the collections share it via `Rc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub city: String,
    pub country: String,
    pub email: String,
    pub subscription_date: Option<NaiveDate>,
    pub website: String,
}

impl Record {
    /// Build a record from its nine columns in [`Field::ALL`] order. Missing
    /// trailing columns are empty; the date column is parsed with
    /// [`parse_date`].
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Record {
        let col = |i: usize| fields.get(i).map(|s| s.as_ref()).unwrap_or("").to_string();
        return Record {
            customer_id: col(0),
            first_name: col(1),
            last_name: col(2),
            company: col(3),
            city: col(4),
            country: col(5),
            email: col(6),
            subscription_date: parse_date(&col(7)),
            website: col(8),
        };
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = match self.subscription_date {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => String::new(),
        };
        return write!(
            f,
            "{} - {} - {} - {} - {} - {} - {} - {} - {}",
            self.customer_id,
            self.first_name,
            self.last_name,
            self.company,
            self.city,
            self.country,
            self.email,
            date,
            self.website,
        );
    }
}

/// Parse a subscription date. Blank or unrecognized text is `None`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    return DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok());
}

/// A record column, used wherever the key function is chosen at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    CustomerId,
    FirstName,
    LastName,
    Company,
    City,
    Country,
    Email,
    SubscriptionDate,
    Website,
}

impl Field {
    /// Column order of a header-less file.
    pub const ALL: [Field; 9] = [
        Field::CustomerId,
        Field::FirstName,
        Field::LastName,
        Field::Company,
        Field::City,
        Field::Country,
        Field::Email,
        Field::SubscriptionDate,
        Field::Website,
    ];

    /// Position in [`Field::ALL`].
    pub fn position(self) -> usize {
        return self as usize;
    }

    pub fn name(self) -> &'static str {
        return match self {
            Field::CustomerId => "customer_id",
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Company => "company",
            Field::City => "city",
            Field::Country => "country",
            Field::Email => "email",
            Field::SubscriptionDate => "subscription_date",
            Field::Website => "website",
        };
    }

    pub fn label(self) -> &'static str {
        return match self {
            Field::CustomerId => "Customer Id",
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Company => "Company",
            Field::City => "City",
            Field::Country => "Country",
            Field::Email => "Email",
            Field::SubscriptionDate => "Subscription Date",
            Field::Website => "Website",
        };
    }

    /// Lower-case header spellings that map to this column.
    pub fn aliases(self) -> &'static [&'static str] {
        return match self {
            Field::CustomerId => &["customer id", "customer_id", "id"],
            Field::FirstName => &["first name", "firstname", "first_name"],
            Field::LastName => &["last name", "lastname", "last_name"],
            Field::Company => &["company", "company name"],
            Field::City => &["city"],
            Field::Country => &["country"],
            Field::Email => &["email"],
            Field::SubscriptionDate => &["subscription date", "subscription_date", "date"],
            Field::Website => &["website", "web"],
        };
    }

    /// The raw text of this column.
    pub fn text(self, record: &Record) -> Option<&str> {
        let text = match self {
            Field::CustomerId => &record.customer_id,
            Field::FirstName => &record.first_name,
            Field::LastName => &record.last_name,
            Field::Company => &record.company,
            Field::City => &record.city,
            Field::Country => &record.country,
            Field::Email => &record.email,
            Field::Website => &record.website,
            Field::SubscriptionDate => return None,
        };
        return Some(text.as_str());
    }

    /// The normalized key of this column. Only an absent date is
    /// [`Key::Missing`]; empty text is an empty string key, which orders
    /// before every non-empty string.
    pub fn get(self, record: &Record) -> Key {
        return match self.text(record) {
            Some(text) => text.into_key(),
            None => record.subscription_date.into_key(),
        };
    }

    /// Turn user input into the key this column would produce for it, so
    /// a lookup value compares like a stored value.
    pub fn parse_key(self, input: &str) -> Result<Key, Error> {
        if self == Field::SubscriptionDate {
            return match parse_date(input) {
                Some(date) => Ok(date.into_key()),
                None => Err(Error::InvalidDate(input.trim().to_string())),
            };
        }
        return Ok(input.trim().into_key());
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(self.label());
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Field, Error> {
        let wanted = s.trim().to_lowercase();
        return Field::ALL
            .into_iter()
            .find(|field| field.name() == wanted || field.aliases().contains(&wanted.as_str()))
            .ok_or(Error::UnknownField(s.trim().to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        return Record::from_fields(&[
            "DD37Cf93aecA6Dc",
            "Sheryl",
            "Baxter",
            "Rasmussen Group",
            "East Leonard",
            "Chile",
            "zunigavanessa@smith.info",
            "2020-08-24",
            "http://www.stephenson.com/",
        ]);
    }

    #[test]
    fn dates_in_three_layouts() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 7);
        assert_eq!(parse_date("2021-03-07"), expected);
        assert_eq!(parse_date("07/03/2021"), expected);
        assert_eq!(parse_date("2021/03/07"), expected);
        assert_eq!(parse_date("  2021-03-07 "), expected);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("March 7th"), None);
        assert_eq!(parse_date("2021-02-30"), None);
    }

    #[test]
    fn display_joins_fields() {
        let text = sample().to_string();
        assert_eq!(
            text,
            "DD37Cf93aecA6Dc - Sheryl - Baxter - Rasmussen Group - East Leonard - Chile - \
             zunigavanessa@smith.info - 2020-08-24 - http://www.stephenson.com/"
        );
        let undated = Record::from_fields(&["1", "a"]);
        assert_eq!(undated.to_string(), format!("1 - a{}", " - ".repeat(7)));
    }

    #[test]
    fn short_rows_fill_empty() {
        let record = Record::from_fields(&["42"]);
        assert_eq!(record.customer_id, "42");
        assert_eq!(record.website, "");
        assert_eq!(record.subscription_date, None);
    }

    #[test]
    fn field_keys() {
        let record = sample();
        assert_eq!(Field::Country.get(&record), Key::text("chile"));
        assert_eq!(
            Field::SubscriptionDate.get(&record),
            NaiveDate::from_ymd_opt(2020, 8, 24).into_key()
        );
        let blank = Record::from_fields(&["1"]);
        assert_eq!(Field::Company.get(&blank), Key::text(""));
        assert!(Field::Company.get(&blank) < Field::Company.get(&record));
        assert_eq!(Field::SubscriptionDate.get(&blank), Key::Missing);
    }

    #[test]
    fn field_names_parse() {
        assert_eq!("country".parse::<Field>().unwrap(), Field::Country);
        assert_eq!("First Name".parse::<Field>().unwrap(), Field::FirstName);
        assert_eq!("id".parse::<Field>().unwrap(), Field::CustomerId);
        assert!("shoe size".parse::<Field>().is_err());
        for field in Field::ALL {
            assert_eq!(Field::ALL[field.position()], field);
        }
    }

    #[test]
    fn parse_key_matches_stored_key() {
        let record = sample();
        assert_eq!(Field::Country.parse_key(" CHILE ").unwrap(), Field::Country.get(&record));
        assert_eq!(
            Field::SubscriptionDate.parse_key("24/08/2020").unwrap(),
            Field::SubscriptionDate.get(&record)
        );
        assert!(Field::SubscriptionDate.parse_key("soon").is_err());
    }
}
