//! CSV ingestion.
//!
//! Every parsed row becomes one shared [`Record`] that is appended to the
//! list, pushed on the stack, enqueued on the queue and inserted into the
//! tree, so all four structures see the same records in file order.

use std::path::Path;
use std::rc::Rc;

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::index_tree::IndexTree;
use crate::list::List;
use crate::queue::Queue;
use crate::record::{Field, Record};
use crate::stack::Stack;

/// One parsed CSV row. Nine inline slots covers the usual record width.
pub type Row = SmallVec<[String; 9]>;

/// Counts gathered while loading.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Records loaded.
    pub count: usize,
    /// Blank rows skipped.
    pub skipped: usize,
    /// Earliest subscription date seen.
    pub min_date: Option<NaiveDate>,
    /// Latest subscription date seen.
    pub max_date: Option<NaiveDate>,
}

impl LoadStats {
    fn observe(&mut self, record: &Record) {
        self.count += 1;
        if let Some(date) = record.subscription_date {
            self.min_date = Some(self.min_date.map_or(date, |d| d.min(date)));
            self.max_date = Some(self.max_date.map_or(date, |d| d.max(date)));
        }
    }
}

/// The four structures filled by one load.
pub struct Loaded {
    pub tree: IndexTree<Rc<Record>>,
    pub list: List<Rc<Record>>,
    pub stack: Stack<Rc<Record>>,
    pub queue: Queue<Rc<Record>>,
    pub stats: LoadStats,
}

/// Read a CSV file and load it, indexing the tree on `tree_key`.
/// Bytes that are not valid UTF-8 are replaced, not rejected.
pub fn load_csv(path: &Path, tree_key: Field) -> Result<Loaded> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let loaded = load_str(&text, tree_key);
    tracing::debug!(
        path = %path.display(),
        count = loaded.stats.count,
        skipped = loaded.stats.skipped,
        "loaded records"
    );
    return Ok(loaded);
}

/// Load CSV text. The first row is always taken as a header.
pub fn load_str(text: &str, tree_key: Field) -> Loaded {
    let mut rows = parse_rows(text).into_iter();
    let columns = match rows.next() {
        Some(header) => Columns::from_header(&header),
        None => Columns::positional(),
    };

    let mut loaded = Loaded {
        tree: IndexTree::new(move |r: &Rc<Record>| tree_key.get(r)),
        list: List::new(),
        stack: Stack::new(),
        queue: Queue::new(),
        stats: LoadStats::default(),
    };

    for (line, row) in rows.enumerate() {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            loaded.stats.skipped += 1;
            continue;
        }
        let record = Rc::new(columns.record(&row));
        let raw_date = columns.cell(&row, Field::SubscriptionDate);
        if record.subscription_date.is_none() && !raw_date.is_empty() {
            // The header is line 1.
            tracing::warn!(line = line + 2, value = raw_date, "unrecognized subscription date");
        }

        loaded.stats.observe(&record);
        loaded.list.append(Rc::clone(&record));
        loaded.stack.push(Rc::clone(&record));
        loaded.queue.enqueue(Rc::clone(&record));
        loaded.tree.insert(record);
    }
    return loaded;
}

/// Where each field lives in a row.
struct Columns {
    index: [Option<usize>; 9],
}

impl Columns {
    /// Header-less layout: the first nine columns in [`Field::ALL`] order.
    fn positional() -> Columns {
        let mut index = [None; 9];
        for (i, slot) in index.iter_mut().enumerate() {
            *slot = Some(i);
        }
        return Columns { index };
    }

    /// Resolve header names through the field aliases. The first matching
    /// alias wins. With no recognizable column at all, fall back to the
    /// positional layout (the header row is still consumed).
    fn from_header(header: &[String]) -> Columns {
        let mut positions: FxHashMap<String, usize> = FxHashMap::default();
        for (i, name) in header.iter().enumerate() {
            positions.entry(name.trim().to_lowercase()).or_insert(i);
        }

        let mut index = [None; 9];
        for field in Field::ALL {
            index[field.position()] = field
                .aliases()
                .iter()
                .find_map(|alias| positions.get(*alias).copied());
        }
        if index.iter().all(Option::is_none) {
            return Columns::positional();
        }
        return Columns { index };
    }

    fn cell<'r>(&self, row: &'r [String], field: Field) -> &'r str {
        return match self.index[field.position()] {
            Some(i) => row.get(i).map(|s| s.trim()).unwrap_or(""),
            None => "",
        };
    }

    fn record(&self, row: &[String]) -> Record {
        let cells: SmallVec<[&str; 9]> = Field::ALL.iter().map(|f| self.cell(row, *f)).collect();
        return Record::from_fields(&cells);
    }
}

/// Split CSV text into rows of cells.
///
/// Cells may be wrapped in double quotes, which protects commas and line
/// breaks; a doubled quote inside quotes is a literal quote. Rows end at
/// `\n` or `\r\n`. An unterminated quote runs to the end of the input.
pub fn parse_rows(text: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut row = Row::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if quoted {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => quoted = false,
                _ => cell.push(c),
            }
            continue;
        }
        match c {
            '"' => quoted = true,
            ',' => row.push(std::mem::take(&mut cell)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
            }
            _ => cell.push(c),
        }
    }
    if quoted {
        tracing::warn!("unterminated quoted field at end of input");
    }
    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }
    return rows;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(row: &Row) -> Vec<&str> {
        return row.iter().map(|s| s.as_str()).collect();
    }

    #[test]
    fn plain_rows() {
        let rows = parse_rows("a,b,c\n1,2,3\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(cells(&rows[0]), vec!["a", "b", "c"]);
        assert_eq!(cells(&rows[1]), vec!["1", "2", "3"]);
    }

    #[test]
    fn quoted_cells() {
        let rows = parse_rows("\"Smith, Jones\",\"say \"\"hi\"\"\",\"two\nlines\"\r\nx,,\n");
        assert_eq!(cells(&rows[0]), vec!["Smith, Jones", "say \"hi\"", "two\nlines"]);
        assert_eq!(cells(&rows[1]), vec!["x", "", ""]);
    }

    #[test]
    fn last_row_without_newline() {
        let rows = parse_rows("h\nlast");
        assert_eq!(rows.len(), 2);
        assert_eq!(cells(&rows[1]), vec!["last"]);
        assert!(parse_rows("").is_empty());
    }

    #[test]
    fn header_aliases_reorder_columns() {
        let text = "Index,Country,Customer Id,First Name,Subscription Date\n\
                    1,Chile,C-9,Ana,2021-04-05\n\
                    2,Peru,C-3,Luis,\n";
        let loaded = load_str(text, Field::CustomerId);
        assert_eq!(loaded.stats.count, 2);
        let first = loaded.list.front().unwrap();
        assert_eq!(first.customer_id, "C-9");
        assert_eq!(first.country, "Chile");
        assert_eq!(first.first_name, "Ana");
        assert_eq!(first.company, "");
        assert_eq!(loaded.stats.min_date, NaiveDate::from_ymd_opt(2021, 4, 5));
        assert_eq!(loaded.stats.max_date, loaded.stats.min_date);
    }

    #[test]
    fn unknown_header_falls_back_to_positions() {
        let text = "a,b,c,d,e,f,g,h,i\n7,Jo,Lee,Acme,Lima,Peru,jo@x.io,01/02/2020,acme.io\n";
        let loaded = load_str(text, Field::CustomerId);
        let record = loaded.list.front().unwrap();
        assert_eq!(record.customer_id, "7");
        assert_eq!(record.website, "acme.io");
        assert_eq!(record.subscription_date, NaiveDate::from_ymd_opt(2020, 2, 1));
    }

    #[test]
    fn fills_all_four_structures() {
        let text = "id,country\n1, US \n\n2,CA\n , \n3,us\n";
        let mut loaded = load_str(text, Field::Country);
        assert_eq!(loaded.stats.count, 3);
        assert_eq!(loaded.stats.skipped, 2);
        assert_eq!(loaded.list.len(), 3);
        assert_eq!(loaded.tree.size(), 3);
        assert_eq!(loaded.tree.distinct_keys(), 2);
        assert_eq!(loaded.tree.find("US").len(), 2);
        assert_eq!(loaded.stack.pop().unwrap().customer_id, "3");
        assert_eq!(loaded.queue.dequeue().unwrap().customer_id, "1");
        // Values are trimmed.
        assert_eq!(loaded.list.front().unwrap().country, "US");
        // The same allocation is shared.
        let from_list = loaded.list.front().unwrap();
        let from_tree = loaded.tree.find("us");
        assert!(Rc::ptr_eq(from_list, from_tree.front().unwrap()));
    }
}
