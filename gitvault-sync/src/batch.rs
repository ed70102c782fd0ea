//! Greedy byte-budget packing of classified files into commit batches.

use gitvault_core::{Batch, CommitPlan, FileRecord};

/// Pack `to_batch` into ordered batches bounded by `max_batch_bytes`, plus
/// one unbounded, always-first deletion batch when `deleted` is non-empty.
///
/// Greedy first-fit-by-arrival: files accumulate into the current batch
/// while the running total stays within budget; a file that would overflow
/// closes the batch and opens the next one with itself. A single file larger
/// than the whole budget is admitted as a singleton batch.
pub fn plan(to_batch: &[FileRecord], deleted: &[String], max_batch_bytes: u64) -> CommitPlan {
    let mut additions = Vec::new();
    let mut current = Batch::default();

    for record in to_batch {
        if current.total_bytes + record.size > max_batch_bytes {
            if !current.is_empty() {
                additions.push(current);
            }
            current = Batch {
                paths: vec![record.path.clone()],
                total_bytes: record.size,
            };
        } else {
            current.paths.push(record.path.clone());
            current.total_bytes += record.size;
        }
    }
    if !current.is_empty() {
        additions.push(current);
    }

    CommitPlan {
        deletions: deleted.to_vec(),
        additions,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use gitvault_core::ChangeStatus;

    fn record(path: &str, size: u64) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            size,
            status: ChangeStatus::New,
        }
    }

    #[test]
    fn packs_until_the_budget_would_overflow() {
        let files = vec![
            record("a", 40),
            record("b", 40),
            record("c", 40), // 120 > 100, closes the first batch
            record("d", 10),
        ];
        let plan = plan(&files, &[], 100);
        assert_eq!(plan.additions.len(), 2);
        assert_eq!(plan.additions[0].paths, vec!["a", "b"]);
        assert_eq!(plan.additions[0].total_bytes, 80);
        assert_eq!(plan.additions[1].paths, vec!["c", "d"]);
        assert_eq!(plan.additions[1].total_bytes, 50);
    }

    #[test]
    fn budget_invariant_holds_except_for_singletons() {
        let files = vec![
            record("a", 60),
            record("b", 60),
            record("huge", 500),
            record("c", 10),
        ];
        let plan = plan(&files, &[], 100);
        for batch in &plan.additions {
            assert!(batch.total_bytes <= 100 || batch.len() == 1);
        }
    }

    #[test]
    fn oversized_file_forms_its_own_batch() {
        let files = vec![record("a", 10), record("huge", 500), record("b", 10)];
        let plan = plan(&files, &[], 100);
        assert_eq!(plan.additions.len(), 3);
        assert_eq!(plan.additions[1].paths, vec!["huge"]);
    }

    #[test]
    fn every_file_lands_in_exactly_one_batch_in_order() {
        let files: Vec<FileRecord> = (0..20).map(|i| record(&format!("f{i:02}"), 7)).collect();
        let plan = plan(&files, &[], 20);

        let flattened: Vec<&str> = plan
            .additions
            .iter()
            .flat_map(|b| b.paths.iter().map(String::as_str))
            .collect();
        let expected: Vec<String> = (0..20).map(|i| format!("f{i:02}")).collect();
        assert_eq!(flattened, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn deletions_become_the_unbounded_first_batch() {
        let plan = plan(&[record("a", 10)], &["x".to_string(), "y".to_string()], 100);
        assert_eq!(plan.deletions, vec!["x", "y"]);
        assert_eq!(plan.commit_count(), 2);
    }

    #[test]
    fn empty_input_yields_an_empty_plan() {
        let plan = plan(&[], &[], 100);
        assert!(plan.is_empty());
    }
}
