use std::collections::{BTreeMap, HashMap};

use crate::commit::{Category, ClassifiedCommit};

/// The commits of a single date, keyed by `YYYY-MM-DD`
pub type DateMap = BTreeMap<String, Vec<ClassifiedCommit>>;

/// The grouped commits every changelog format is rendered from
#[derive(Debug, Default)]
pub struct SectionMap {
    /// The top level map of the changelog, i.e. categories -> commits
    pub sections: HashMap<Category, Vec<ClassifiedCommit>>,
    /// Commits by date, for the date oriented layout
    pub dates: DateMap,
}

impl SectionMap {
    /// Creates a section map from a vector of commits, which we can then
    /// iterate through and write. Commits keep their input order within each
    /// category and within each date.
    ///
    /// # Example
    ///
    /// ```
    /// # use git_changelog::{classify, Category, RawCommit, SectionMap};
    /// let raw = RawCommit {
    ///     hash: "0123456789abcdef".into(),
    ///     subject: "feat: add login".into(),
    ///     author: "Jane".into(),
    ///     date: "2024-01-02".into(),
    ///     body: String::new(),
    /// };
    /// let sm = SectionMap::from_commits(vec![classify(&raw)]);
    ///
    /// assert_eq!(sm.sections[&Category::Added].len(), 1);
    /// assert_eq!(sm.dates_desc().count(), 1);
    /// ```
    pub fn from_commits(commits: Vec<ClassifiedCommit>) -> SectionMap {
        let mut sm = SectionMap::default();

        for entry in commits {
            sm.dates
                .entry(entry.commit.date.clone())
                .or_default()
                .push(entry.clone());
            sm.sections.entry(entry.category).or_default().push(entry);
        }

        sm
    }

    /// Non-empty categories in display order
    pub fn categories(&self) -> impl Iterator<Item = (Category, &Vec<ClassifiedCommit>)> {
        Category::DISPLAY_ORDER.into_iter().filter_map(move |cat| {
            self.sections
                .get(&cat)
                .filter(|entries| !entries.is_empty())
                .map(|entries| (cat, entries))
        })
    }

    /// Dates from most to least recent
    pub fn dates_desc(&self) -> impl Iterator<Item = (&String, &Vec<ClassifiedCommit>)> {
        self.dates.iter().rev()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{commit::classify, git::RawCommit};

    fn commit(hash: &str, subject: &str, date: &str) -> ClassifiedCommit {
        classify(&RawCommit {
            hash: hash.into(),
            subject: subject.into(),
            author: "Jane Doe".into(),
            date: date.into(),
            body: String::new(),
        })
    }

    fn hashes(entries: &[ClassifiedCommit]) -> Vec<&str> {
        entries.iter().map(|c| c.commit.hash.as_str()).collect()
    }

    #[test]
    fn preserves_order_within_category() {
        let sm = SectionMap::from_commits(vec![
            commit("a", "feat: one", "2024-01-03"),
            commit("b", "fix: two", "2024-01-03"),
            commit("c", "feat: three", "2024-01-02"),
            commit("d", "feat(x): four", "2024-01-01"),
        ]);

        assert_eq!(hashes(&sm.sections[&Category::Added]), ["a", "c", "d"]);
        assert_eq!(hashes(&sm.sections[&Category::Fixed]), ["b"]);
    }

    #[test]
    fn categories_follow_display_order() {
        let sm = SectionMap::from_commits(vec![
            commit("a", "chore: bump", "2024-01-01"),
            commit("b", "random subject", "2024-01-01"),
            commit("c", "feat: new", "2024-01-01"),
            commit("d", "feat!: breaking", "2024-01-01"),
        ]);

        let cats: Vec<Category> = sm.categories().map(|(c, _)| c).collect();
        assert_eq!(
            cats,
            [
                Category::Breaking,
                Category::Added,
                Category::Maintenance,
                Category::Other
            ]
        );
    }

    #[test]
    fn dates_descend() {
        let sm = SectionMap::from_commits(vec![
            commit("a", "x", "2024-01-02"),
            commit("b", "y", "2024-02-10"),
            commit("c", "z", "2023-12-31"),
            commit("d", "w", "2024-01-02"),
        ]);

        let dates: Vec<&str> = sm.dates_desc().map(|(d, _)| d.as_str()).collect();
        assert_eq!(dates, ["2024-02-10", "2024-01-02", "2023-12-31"]);
        assert_eq!(hashes(&sm.dates["2024-01-02"]), ["a", "d"]);
    }

    #[test]
    fn empty() {
        let sm = SectionMap::from_commits(vec![]);
        assert!(sm.is_empty());
        assert_eq!(sm.categories().count(), 0);
        assert_eq!(sm.dates_desc().count(), 0);
    }
}
