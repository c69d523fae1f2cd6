//! The working state behind the menu, held as explicit fields instead of
//! globals: the loaded structures, per-field indices built on demand, and
//! the field and tree of the most recent sort.

use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use crate::config::Config;
use crate::error::Result;
use crate::index_tree::IndexTree;
use crate::key::Key;
use crate::list::List;
use crate::loader::{load_csv, LoadStats, Loaded};
use crate::queue::Queue;
use crate::record::{Field, Record};
use crate::sort::{merge_sort, Algorithm};
use crate::stack::Stack;

pub type Shared = Rc<Record>;

/// A value together with how long it took to produce.
#[derive(Debug)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

fn timed<T>(f: impl FnOnce() -> T) -> Timed<T> {
    let start = Instant::now();
    let value = f();
    return Timed { value, elapsed: start.elapsed() };
}

/// Which structure answered the indexed half of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchPath {
    /// Exact lookup in a cached per-field index.
    Index,
    /// Exact lookup in the tree built by the last sort on this field.
    SortTree,
    /// Predicate scan over the load-time tree.
    TreeScan,
}

/// Indexed and linear answers to the same query.
#[derive(Debug)]
pub struct SearchReport {
    pub path: SearchPath,
    pub indexed: Timed<List<Shared>>,
    pub linear: Timed<List<Shared>>,
}

/// What a sort did.
#[derive(Clone, Debug)]
pub struct SortReport {
    pub field: Field,
    pub algorithm: Algorithm,
    pub count: usize,
    pub elapsed: Duration,
}

/// Customers per country.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryCount {
    pub country: String,
    pub count: usize,
}

#[derive(Clone, Debug)]
pub struct CountryStats {
    /// Distinct countries, i.e. nodes in the country index.
    pub total: usize,
    /// Most customers first; equal counts stay in country order.
    pub rows: List<CountryCount>,
}

/// One node of the level-order view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelEntry {
    pub depth: usize,
    pub key: String,
    pub count: usize,
}

pub struct Session {
    config: Config,
    tree: IndexTree<Shared>,
    list: List<Shared>,
    stack: Stack<Shared>,
    queue: Queue<Shared>,
    stats: LoadStats,
    indices: FxHashMap<Field, IndexTree<Shared>>,
    last_sort: Option<(Field, IndexTree<Shared>)>,
}

impl Session {
    pub fn new(loaded: Loaded, config: Config) -> Session {
        return Session {
            config,
            tree: loaded.tree,
            list: loaded.list,
            stack: loaded.stack,
            queue: loaded.queue,
            stats: loaded.stats,
            indices: FxHashMap::default(),
            last_sort: None,
        };
    }

    /// Load a CSV file into a fresh session.
    pub fn open(path: &Path, config: Config) -> Result<Session> {
        let loaded = load_csv(path, config.primary_key)?;
        return Ok(Session::new(loaded, config));
    }

    pub fn config(&self) -> &Config {
        return &self.config;
    }

    pub fn stats(&self) -> &LoadStats {
        return &self.stats;
    }

    pub fn len(&self) -> usize {
        return self.list.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.list.is_empty();
    }

    /// Records in the current list order.
    pub fn list(&self) -> &List<Shared> {
        return &self.list;
    }

    /// The load-time tree, keyed on the configured primary field.
    pub fn tree(&self) -> &IndexTree<Shared> {
        return &self.tree;
    }

    /// The first `n` records in current order, or all of them.
    pub fn first_n(&self, n: Option<usize>) -> impl Iterator<Item = &Shared> {
        return self.list.iter().take(n.unwrap_or(usize::MAX));
    }

    pub fn last_sort_field(&self) -> Option<Field> {
        return self.last_sort.as_ref().map(|(field, _)| *field);
    }

    /// Reorder the list by `field` and rebuild the last-sort tree on it.
    pub fn sort_by(&mut self, field: Field, algorithm: Algorithm) -> SortReport {
        let sorted = timed(|| algorithm.sort(&self.list, |r: &Shared| field.get(r)));
        self.list = sorted.value;
        self.last_sort = Some((field, self.build_tree(field)));
        tracing::debug!(%field, %algorithm, elapsed = ?sorted.elapsed, "sorted records");
        return SortReport {
            field,
            algorithm,
            count: self.list.len(),
            elapsed: sorted.elapsed,
        };
    }

    /// Sort with the configured algorithm for `field`.
    pub fn sort_default(&mut self, field: Field) -> SortReport {
        let algorithm = self.config.algorithm_for(field);
        return self.sort_by(field, algorithm);
    }

    pub fn has_index(&self, field: Field) -> bool {
        return self.indices.contains_key(&field);
    }

    /// Build (once) and return the index on `field`.
    pub fn build_index(&mut self, field: Field) -> &IndexTree<Shared> {
        if !self.indices.contains_key(&field) {
            let tree = self.build_tree(field);
            tracing::debug!(%field, distinct = tree.distinct_keys(), "built index");
            self.indices.insert(field, tree);
        }
        return &self.indices[&field];
    }

    /// Look up `value` in `field` two ways: through the best available tree
    /// and by scanning the list.
    ///
    /// The tree path prefers a cached index on the field, then the
    /// last-sort tree if it is keyed on the field, and otherwise scans the
    /// load-time tree with a predicate.
    pub fn search_field(&self, field: Field, value: &str) -> Result<SearchReport> {
        let key = field.parse_key(value)?;

        let (path, indexed) = if let Some(index) = self.indices.get(&field) {
            (SearchPath::Index, timed(|| find_in(index, &key)))
        } else if let Some((_, tree)) = self.last_sort.as_ref().filter(|(f, _)| *f == field) {
            (SearchPath::SortTree, timed(|| find_in(tree, &key)))
        } else {
            let scan = timed(|| {
                self.tree
                    .find_by_predicate(|r: &Shared| field.get(r) == key)
                    .cloned()
                    .collect::<List<Shared>>()
            });
            (SearchPath::TreeScan, scan)
        };

        let linear = timed(|| {
            self.list
                .iter()
                .filter(|r| field.get(r) == key)
                .cloned()
                .collect()
        });
        return Ok(SearchReport { path, indexed, linear });
    }

    /// Linear search over the stack (pop everything, push it back).
    pub fn search_stack(&mut self, field: Field, value: &str) -> Result<Timed<List<Shared>>> {
        let key = field.parse_key(value)?;
        let stack = &mut self.stack;
        return Ok(timed(|| stack.scan(|r| field.get(r) == key)));
    }

    /// Linear search over the queue (one full rotation).
    pub fn search_queue(&mut self, field: Field, value: &str) -> Result<Timed<List<Shared>>> {
        let key = field.parse_key(value)?;
        let queue = &mut self.queue;
        return Ok(timed(|| queue.scan(|r| field.get(r) == key)));
    }

    /// Records subscribed between `start` and `end`, both inclusive.
    /// Records without a date never match.
    pub fn search_date_range(&self, start: NaiveDate, end: NaiveDate) -> SearchReport {
        let within = |r: &Shared| match r.subscription_date {
            Some(date) => start <= date && date <= end,
            None => false,
        };
        let indexed = timed(|| self.tree.find_by_predicate(within).cloned().collect());
        let linear = timed(|| self.list.iter().filter(|r| within(*r)).cloned().collect());
        return SearchReport { path: SearchPath::TreeScan, indexed, linear };
    }

    /// Distinct countries and customers per country, largest first.
    pub fn country_stats(&mut self) -> CountryStats {
        let index = self.build_index(Field::Country);
        let total = index.items().count();
        let counts: List<CountryCount> = index
            .items()
            .map(|(key, group)| CountryCount {
                country: display_name(key, group, Field::Country),
                count: group.len(),
            })
            .collect();
        let rows = merge_sort(&counts, |c: &CountryCount| -(c.count as i64));
        return CountryStats { total, rows };
    }

    /// Breadth-first view of the last-sort tree, `None` before any sort.
    pub fn level_view(&self) -> Option<Vec<LevelEntry>> {
        let (field, tree) = self.last_sort.as_ref()?;
        let entries = tree
            .levels()
            .map(|(depth, key, group)| LevelEntry {
                depth,
                key: display_name(key, group, *field),
                count: group.len(),
            })
            .collect();
        return Some(entries);
    }

    fn build_tree(&self, field: Field) -> IndexTree<Shared> {
        let mut tree = IndexTree::new(move |r: &Shared| field.get(r));
        for record in self.list.iter() {
            tree.insert(Rc::clone(record));
        }
        return tree;
    }
}

fn find_in(tree: &IndexTree<Shared>, key: &Key) -> List<Shared> {
    return match tree.group(key) {
        Some(group) => group.clone(),
        None => List::new(),
    };
}

/// Keys are lower-cased, so show the first record's own spelling instead.
fn display_name(key: &Key, group: &List<Shared>, field: Field) -> String {
    let original = group.front().and_then(|r| field.text(r)).filter(|t| !t.is_empty());
    return match original {
        Some(text) => text.to_string(),
        None => key.to_string(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_str;

    const CSV: &str = "\
Customer Id,First Name,Last Name,Company,City,Country,Email,Subscription Date,Website
c3,Ana,Diaz,Acme,Lima,Peru,ana@acme.io,2021-03-01,acme.io
c1,Bo,Li,Initech,Austin,United States,bo@initech.com,2020-01-15,initech.com
c2,Cy,Ng,Acme,Lima,peru,cy@acme.io,,acme.io
c5,Di,Ko,Globex,Reno,United States,di@globex.com,2022-07-04,globex.com
c4,Ed,Ma,Hooli,Quito,Ecuador,ed@hooli.com,2019-11-30,hooli.com
";

    fn session() -> Session {
        let config = Config::default();
        return Session::new(load_str(CSV, config.primary_key), config);
    }

    fn ids(list: &List<Shared>) -> Vec<String> {
        return list.iter().map(|r| r.customer_id.clone()).collect();
    }

    #[test]
    fn sort_reorders_list_and_tracks_field() {
        let mut s = session();
        assert_eq!(s.last_sort_field(), None);
        assert!(s.level_view().is_none());
        let report = s.sort_default(Field::CustomerId);
        assert_eq!(report.algorithm, Algorithm::Merge);
        assert_eq!(report.count, 5);
        assert_eq!(ids(s.list()), vec!["c1", "c2", "c3", "c4", "c5"]);
        assert_eq!(s.last_sort_field(), Some(Field::CustomerId));

        let report = s.sort_default(Field::SubscriptionDate);
        assert_eq!(report.algorithm, Algorithm::Quick);
        assert_eq!(ids(s.list()), vec!["c4", "c1", "c3", "c5", "c2"]);
    }

    #[test]
    fn level_view_follows_last_sort() {
        let mut s = session();
        s.sort_by(Field::Country, Algorithm::Radix);
        let view = s.level_view().unwrap();
        // Ecuador, Peru (x2), United States (x2)
        assert_eq!(view.len(), 3);
        assert_eq!(view[0].depth, 0);
        assert_eq!(view.iter().map(|e| e.count).sum::<usize>(), 5);
        assert!(view.iter().any(|e| e.key == "Peru" && e.count == 2));
    }

    #[test]
    fn search_paths() {
        let mut s = session();
        let report = s.search_field(Field::Country, "PERU").unwrap();
        assert_eq!(report.path, SearchPath::TreeScan);
        assert_eq!(ids(&report.indexed.value), vec!["c2", "c3"]);
        assert_eq!(ids(&report.linear.value), vec!["c3", "c2"]);

        s.sort_default(Field::Country);
        let report = s.search_field(Field::Country, "peru").unwrap();
        assert_eq!(report.path, SearchPath::SortTree);
        assert_eq!(report.indexed.value.len(), 2);

        s.build_index(Field::Company);
        assert!(s.has_index(Field::Company));
        let report = s.search_field(Field::Company, "acme").unwrap();
        assert_eq!(report.path, SearchPath::Index);
        assert_eq!(report.indexed.value.len(), 2);
        assert_eq!(report.linear.value.len(), 2);

        assert!(s.search_field(Field::Country, "Atlantis").unwrap().indexed.value.is_empty());
    }

    #[test]
    fn stack_and_queue_searches_restore_order() {
        let mut s = session();
        let hits = s.search_stack(Field::Company, "Acme").unwrap();
        assert_eq!(ids(&hits.value), vec!["c2", "c3"]);
        let hits = s.search_queue(Field::Company, "Acme").unwrap();
        assert_eq!(ids(&hits.value), vec!["c3", "c2"]);
        // A second pass sees the same contents.
        assert_eq!(s.search_stack(Field::City, "lima").unwrap().value.len(), 2);
        assert_eq!(s.search_queue(Field::City, "lima").unwrap().value.len(), 2);
    }

    #[test]
    fn date_range_is_inclusive() {
        let s = session();
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        let report = s.search_date_range(d(2020, 1, 15), d(2021, 3, 1));
        assert_eq!(ids(&report.indexed.value), vec!["c1", "c3"]);
        assert_eq!(report.linear.value.len(), 2);
        assert!(s.search_field(Field::SubscriptionDate, "not a date").is_err());
        let report = s.search_field(Field::SubscriptionDate, "30/11/2019").unwrap();
        assert_eq!(ids(&report.linear.value), vec!["c4"]);
    }

    #[test]
    fn country_stats_largest_first() {
        let mut s = session();
        let stats = s.country_stats();
        assert_eq!(stats.total, 3);
        let rows: Vec<(String, usize)> = stats.rows.iter().map(|c| (c.country.clone(), c.count)).collect();
        assert_eq!(
            rows,
            vec![
                ("Peru".to_string(), 2),
                ("United States".to_string(), 2),
                ("Ecuador".to_string(), 1),
            ]
        );
        assert!(s.has_index(Field::Country));
    }

    #[test]
    fn blank_text_sorts_first_and_is_searchable() {
        let csv = "Customer Id,Company\nc1,Beta\nc2,\nc3,Alpha\n";
        let config = Config::default();
        let mut s = Session::new(load_str(csv, config.primary_key), config);
        for algorithm in Algorithm::ALL {
            s.sort_by(Field::Company, algorithm);
            assert_eq!(ids(s.list()), vec!["c2", "c3", "c1"], "{algorithm}");
        }

        let s = Session::new(load_str(csv, Field::CustomerId), Config::default());
        let report = s.search_field(Field::Company, "").unwrap();
        assert_eq!(report.path, SearchPath::TreeScan);
        assert_eq!(ids(&report.indexed.value), vec!["c2"]);
        assert_eq!(ids(&report.linear.value), vec!["c2"]);
    }

    #[test]
    fn load_stats_and_preview() {
        let s = session();
        assert_eq!(s.len(), 5);
        assert_eq!(s.stats().min_date, NaiveDate::from_ymd_opt(2019, 11, 30));
        assert_eq!(s.stats().max_date, NaiveDate::from_ymd_opt(2022, 7, 4));
        assert_eq!(s.first_n(Some(2)).count(), 2);
        assert_eq!(s.first_n(None).count(), 5);
        assert_eq!(s.tree().find("C3").len(), 1);
    }
}
