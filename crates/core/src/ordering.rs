use std::cmp::Ordering;

use crate::model::{EntryKind, PathEntry};

/// Directories first, then case-folded name, then raw name so that
/// `Readme` and `README` still have a fixed relative order.
pub fn compare_entries(a: &PathEntry, b: &PathEntry) -> Ordering {
    kind_rank(a.kind)
        .cmp(&kind_rank(b.kind))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

pub fn sort_entries(entries: &mut [PathEntry]) {
    entries.sort_by(compare_entries);
}

fn kind_rank(kind: EntryKind) -> u8 {
    match kind {
        EntryKind::Directory => 0,
        EntryKind::File => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dir_entry, file_entry};

    fn names(entries: &[PathEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn directories_sort_before_files() {
        let mut entries = vec![file_entry("b.txt", "x"), dir_entry("A")];
        sort_entries(&mut entries);
        assert_eq!(names(&entries), ["A", "b.txt"]);
    }

    #[test]
    fn names_compare_case_insensitively_within_kind() {
        let mut entries = vec![
            file_entry("zeta.md", "x"),
            file_entry("Alpha.md", "x"),
            dir_entry("src"),
            file_entry("beta.md", "x"),
            dir_entry("Docs"),
            dir_entry("assets"),
        ];
        sort_entries(&mut entries);
        assert_eq!(
            names(&entries),
            ["assets", "Docs", "src", "Alpha.md", "beta.md", "zeta.md"]
        );
    }

    #[test]
    fn fold_ties_have_a_fixed_order() {
        let mut forward = vec![file_entry("readme", "x"), file_entry("README", "x")];
        let mut backward = vec![file_entry("README", "x"), file_entry("readme", "x")];
        sort_entries(&mut forward);
        sort_entries(&mut backward);
        assert_eq!(names(&forward), names(&backward));
    }

    #[test]
    fn sorted_output_satisfies_listing_invariant() {
        let mut entries = vec![
            file_entry("b", "x"),
            dir_entry("c"),
            file_entry("A", "x"),
            dir_entry("B"),
            file_entry("a", "x"),
            dir_entry("a"),
        ];
        sort_entries(&mut entries);

        let first_file = entries.iter().position(|e| !e.is_dir()).unwrap();
        assert!(entries[..first_file].iter().all(PathEntry::is_dir));
        assert!(entries[first_file..].iter().all(|e| !e.is_dir()));
        for group in [&entries[..first_file], &entries[first_file..]] {
            for pair in group.windows(2) {
                assert!(pair[0].name.to_lowercase() <= pair[1].name.to_lowercase());
            }
        }
    }
}
