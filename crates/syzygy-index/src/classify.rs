//! Piece-count classification of raw table names.

use std::collections::BTreeSet;
use std::path::Path;

/// Letters that denote a distinguishable unit in a table name stem.
pub const PIECE_LETTERS: &str = "KPNBRQ";

/// One accepted table from the mirror index.
///
/// `piece_count` is always derived from `name` by [`piece_count`]; it is
/// never carried as independent metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableEntry {
    pub name: String,
    pub piece_count: u32,
}

/// Counts piece letters in the file stem of `name`'s final path component.
///
/// A pure function of the stem's characters: `KPvK` yields 3, `KQRvKR`
/// yields 5, and names without a stem yield 0.
pub fn piece_count(name: &str) -> u32 {
    let stem = Path::new(name)
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    stem.chars().filter(|c| PIECE_LETTERS.contains(*c)).count() as u32
}

/// Classifies raw names into entries whose piece count is in `accepted`,
/// sorted ascending by `(piece_count, name)`.
///
/// Rejections are silent; most index entries are expected to fall outside
/// the accepted set. An empty result is a valid outcome.
pub fn classify_tables<I, S>(names: I, accepted: &BTreeSet<u32>) -> Vec<TableEntry>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut entries: Vec<TableEntry> = names
        .into_iter()
        .map(Into::into)
        .filter_map(|name| {
            let piece_count = piece_count(&name);
            if accepted.contains(&piece_count) {
                Some(TableEntry { name, piece_count })
            } else {
                tracing::debug!(%name, piece_count, "rejected table name");
                None
            }
        })
        .collect();
    entries.sort_by(|a, b| {
        (a.piece_count, a.name.as_str()).cmp(&(b.piece_count, b.name.as_str()))
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted() -> BTreeSet<u32> {
        BTreeSet::from([3, 4])
    }

    #[test]
    fn counts_piece_letters_in_stem() {
        assert_eq!(piece_count("KPvK.rtbw"), 3);
        assert_eq!(piece_count("KQRvKR.rtbw"), 5);
        assert_eq!(piece_count("KNvKP.rtbw"), 4);
        assert_eq!(piece_count("readme.txt"), 0);
    }

    #[test]
    fn stem_is_taken_from_final_path_component() {
        assert_eq!(piece_count("wdl/KPvK.rtbw"), 3);
    }

    #[test]
    fn keeps_only_accepted_counts() {
        let entries = classify_tables(
            ["KPvK.rtbw", "KQRvKR.rtbw", "KNvKP.rtbw", "readme.txt"],
            &accepted(),
        );
        assert_eq!(
            entries,
            vec![
                TableEntry {
                    name: "KPvK.rtbw".to_string(),
                    piece_count: 3,
                },
                TableEntry {
                    name: "KNvKP.rtbw".to_string(),
                    piece_count: 4,
                },
            ]
        );
    }

    #[test]
    fn sorts_by_piece_count_then_name() {
        let entries = classify_tables(
            ["KQvKR.rtbw", "KPvK.rtbw", "KNvK.rtbw", "KQvK.rtbw"],
            &accepted(),
        );
        let keys: Vec<(u32, &str)> = entries
            .iter()
            .map(|e| (e.piece_count, e.name.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (3, "KNvK.rtbw"),
                (3, "KPvK.rtbw"),
                (3, "KQvK.rtbw"),
                (4, "KQvKR.rtbw"),
            ]
        );
    }

    #[test]
    fn classification_is_deterministic() {
        let names = ["KQvKR.rtbw", "KPvK.rtbw", "KNvK.rtbw"];
        assert_eq!(
            classify_tables(names, &accepted()),
            classify_tables(names, &accepted())
        );
    }

    #[test]
    fn duplicate_names_classify_identically() {
        let entries = classify_tables(["KPvK.rtbw", "KPvK.rtbw"], &accepted());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], entries[1]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(classify_tables(Vec::<String>::new(), &accepted()).is_empty());
    }
}
