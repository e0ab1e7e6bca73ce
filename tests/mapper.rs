mod common;

use csv_import_mapper::bucket::Bucket;
use csv_import_mapper::mapper::{ColumnMapper, DropEvent, PreviewOutcome, SeedState};
use csv_import_mapper::preview::CsvPreview;
use proptest::prelude::*;

use common::qa_preview;

fn seeded_qa() -> ColumnMapper {
    let mut mapper = ColumnMapper::new();
    assert_eq!(mapper.load_preview(qa_preview()), Ok(PreviewOutcome::Seeded));
    mapper
}

fn snapshot(mapper: &ColumnMapper) -> Vec<Vec<String>> {
    Bucket::ALL
        .iter()
        .map(|bucket| mapper.bucket(*bucket).to_vec())
        .collect()
}

fn assert_partition(mapper: &ColumnMapper, names: &[String]) {
    for name in names {
        let holders = Bucket::ALL
            .iter()
            .filter(|bucket| mapper.bucket(**bucket).contains(name))
            .count();
        assert_eq!(holders, 1, "column {name} held by {holders} bucket(s)");
    }
    let total: usize = Bucket::ALL.iter().map(|b| mapper.bucket(*b).len()).sum();
    assert_eq!(total, names.len());
}

#[test]
fn default_assignment_for_question_answer_preview() {
    let mapper = seeded_qa();
    assert_eq!(mapper.state(), SeedState::Seeded);
    assert_eq!(mapper.bucket(Bucket::Input).to_vec(), vec!["question"]);
    assert_eq!(mapper.bucket(Bucket::Expected).to_vec(), vec!["answer"]);
    assert_eq!(mapper.bucket(Bucket::Metadata).to_vec(), vec!["notes"]);
    assert_eq!(mapper.bucket(Bucket::Unmapped).to_vec(), vec!["id"]);
}

#[test]
fn dragging_notes_to_unmapped() {
    let mut mapper = seeded_qa();
    let changed = mapper.apply_drop(&DropEvent::new("notes", "metadata", Some("unmapped")));
    assert!(changed);
    assert!(mapper.bucket(Bucket::Metadata).is_empty());
    assert_eq!(mapper.bucket(Bucket::Unmapped).to_vec(), vec!["id", "notes"]);
    assert_eq!(mapper.bucket_of("notes"), Some(Bucket::Unmapped));
}

#[test]
fn move_changes_only_the_moved_column() {
    let mut mapper = seeded_qa();
    assert!(mapper.move_column(Bucket::Unmapped, Bucket::Metadata, "id"));
    assert_eq!(mapper.bucket(Bucket::Metadata).to_vec(), vec!["notes", "id"]);
    assert!(mapper.bucket(Bucket::Unmapped).is_empty());
    assert_eq!(mapper.bucket(Bucket::Input).to_vec(), vec!["question"]);
    assert_eq!(mapper.bucket(Bucket::Expected).to_vec(), vec!["answer"]);
}

#[test]
fn same_bucket_move_is_a_no_op() {
    let mut mapper = seeded_qa();
    let before = snapshot(&mapper);
    assert!(!mapper.move_column(Bucket::Input, Bucket::Input, "question"));
    assert!(!mapper.apply_drop(&DropEvent::new("question", "input", Some("input"))));
    assert_eq!(snapshot(&mapper), before);
}

#[test]
fn invalid_or_missing_drop_targets_are_ignored() {
    let mut mapper = seeded_qa();
    let before = snapshot(&mapper);

    assert!(!mapper.apply_drop(&DropEvent::new("question", "input", None)));
    assert!(!mapper.apply_drop(&DropEvent::new("question", "input", Some("trash"))));
    assert!(!mapper.apply_drop(&DropEvent::new("question", "sidebar", Some("expected"))));
    assert!(!mapper.apply_drop(&DropEvent {
        column: "question".to_string(),
        source: None,
        target: Some("expected".to_string()),
    }));

    assert_eq!(snapshot(&mapper), before);
}

#[test]
fn add_then_remove_restores_the_bucket() {
    let mut mapper = seeded_qa();
    let before = mapper.bucket(Bucket::Expected).clone();

    assert!(mapper.add_to_bucket(Bucket::Expected, "id"));
    assert!(!mapper.add_to_bucket(Bucket::Expected, "id"));
    assert_eq!(mapper.bucket(Bucket::Expected).to_vec(), vec!["answer", "id"]);

    assert!(mapper.remove_from_bucket(Bucket::Expected, "id"));
    assert!(!mapper.remove_from_bucket(Bucket::Expected, "id"));
    assert_eq!(mapper.bucket(Bucket::Expected), &before);
    assert_eq!(mapper.bucket_of("id"), Some(Bucket::Unmapped));
}

#[test]
fn add_then_remove_restores_unmapped() {
    let mut mapper = seeded_qa();
    let before = mapper.bucket(Bucket::Unmapped).clone();

    assert!(mapper.add_to_bucket(Bucket::Unmapped, "answer"));
    assert!(mapper.remove_from_bucket(Bucket::Unmapped, "answer"));

    assert_eq!(mapper.bucket(Bucket::Unmapped), &before);
    assert_eq!(mapper.bucket(Bucket::Expected).to_vec(), vec!["answer"]);
}

#[test]
fn add_takes_the_column_from_its_current_bucket() {
    let mut mapper = seeded_qa();
    assert!(mapper.add_to_bucket(Bucket::Input, "answer"));
    assert!(mapper.bucket(Bucket::Expected).is_empty());
    assert_eq!(mapper.mapping().input, vec!["question", "answer"]);
}

#[test]
fn re_arriving_preview_keeps_user_edits() {
    let mut mapper = seeded_qa();
    mapper.move_column(Bucket::Input, Bucket::Unmapped, "question");
    mapper.move_column(Bucket::Unmapped, Bucket::Input, "id");
    let before = snapshot(&mapper);

    assert_eq!(mapper.load_preview(qa_preview()), Ok(PreviewOutcome::Retained));
    let other = CsvPreview::from_names("other.csv", ["x", "y"]);
    assert_eq!(mapper.load_preview(other), Ok(PreviewOutcome::Retained));

    assert_eq!(snapshot(&mapper), before);
    assert_eq!(mapper.preview().map(|p| p.file_name.as_str()), Some("qa.csv"));
}

#[test]
fn reset_returns_to_unseeded_and_allows_reseeding() {
    let mut mapper = seeded_qa();
    mapper.move_column(Bucket::Input, Bucket::Unmapped, "question");
    mapper.reset();

    assert_eq!(mapper.state(), SeedState::Unseeded);
    assert!(mapper.preview().is_none());
    assert!(Bucket::ALL.iter().all(|b| mapper.bucket(*b).is_empty()));
    assert!(!mapper.can_submit());

    assert_eq!(mapper.load_preview(qa_preview()), Ok(PreviewOutcome::Seeded));
    assert_eq!(mapper.bucket(Bucket::Input).to_vec(), vec!["question"]);
}

#[test]
fn mapping_drops_unmapped_and_keeps_insertion_order() {
    let mut mapper = seeded_qa();
    mapper.move_column(Bucket::Unmapped, Bucket::Input, "id");
    mapper.move_column(Bucket::Metadata, Bucket::Input, "notes");

    let mapping = mapper.mapping();
    assert_eq!(mapping.input, vec!["question", "id", "notes"]);
    assert_eq!(mapping.expected, vec!["answer"]);
    assert!(mapping.metadata.is_empty());

    let json = serde_json::to_value(&mapping).expect("mapping json");
    assert_eq!(
        json,
        serde_json::json!({
            "input": ["question", "id", "notes"],
            "expected": ["answer"],
            "metadata": []
        })
    );
}

#[test]
fn submit_gate_follows_input_bucket() {
    let mut mapper = seeded_qa();
    assert!(mapper.can_submit());
    mapper.remove_from_bucket(Bucket::Input, "question");
    assert!(!mapper.can_submit());
}

fn unique_names() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set("[A-Za-z_ ]{1,12}", 1..12)
        .prop_map(|set| set.into_iter().collect())
}

fn action() -> impl Strategy<Value = (usize, usize, usize, u8)> {
    (0..4usize, 0..4usize, 0..32usize, 0..3u8)
}

proptest! {
    #[test]
    fn partition_holds_after_seeding_and_edits(
        names in unique_names(),
        actions in proptest::collection::vec(action(), 0..24),
    ) {
        let mut mapper = ColumnMapper::new();
        mapper
            .load_preview(CsvPreview::from_names("prop.csv", names.iter().cloned()))
            .expect("seed");
        assert_partition(&mapper, &names);
        let seeded_roles = Bucket::ROLES
            .iter()
            .filter(|b| !mapper.bucket(**b).is_empty())
            .count();
        prop_assert!(seeded_roles >= 1);
        prop_assert!(Bucket::ROLES.iter().all(|b| mapper.bucket(*b).len() <= 1));

        for (from, to, column, kind) in actions {
            let from = Bucket::ALL[from];
            let to = Bucket::ALL[to];
            let column = &names[column % names.len()];
            match kind {
                0 => { mapper.move_column(from, to, column); }
                1 => { mapper.add_to_bucket(to, column); }
                _ => { mapper.remove_from_bucket(from, column); }
            }
            assert_partition(&mapper, &names);
        }
    }

    #[test]
    fn add_then_remove_restores_any_bucket(
        names in unique_names(),
        drags in proptest::collection::vec((0..4usize, 0..32usize), 0..8),
        target in 0..4usize,
        pick in 0..32usize,
    ) {
        let mut mapper = ColumnMapper::new();
        mapper
            .load_preview(CsvPreview::from_names("prop.csv", names.iter().cloned()))
            .expect("seed");
        for (to, column) in drags {
            let column = &names[column % names.len()];
            let from = mapper.bucket_of(column).expect("column is placed");
            mapper.move_column(from, Bucket::ALL[to], column);
        }

        let target = Bucket::ALL[target];
        let column = names[pick % names.len()].clone();
        prop_assume!(!mapper.bucket(target).contains(&column));
        let before = mapper.bucket(target).clone();

        prop_assert!(mapper.add_to_bucket(target, &column));
        prop_assert!(mapper.bucket(target).contains(&column));
        prop_assert!(mapper.remove_from_bucket(target, &column));
        prop_assert_eq!(mapper.bucket(target), &before);
        assert_partition(&mapper, &names);
    }

    #[test]
    fn move_affects_only_source_and_destination(
        names in unique_names(),
        to in 0..4usize,
        pick in 0..32usize,
    ) {
        let mut mapper = ColumnMapper::new();
        mapper
            .load_preview(CsvPreview::from_names("prop.csv", names.iter().cloned()))
            .expect("seed");
        let column = names[pick % names.len()].clone();
        let from = mapper.bucket_of(&column).expect("column is placed");
        let to = Bucket::ALL[to];
        let before = snapshot(&mapper);

        let changed = mapper.move_column(from, to, &column);
        prop_assert_eq!(changed, from != to);
        if from != to {
            prop_assert!(!mapper.bucket(from).contains(&column));
            prop_assert!(mapper.bucket(to).contains(&column));
        }
        for bucket in Bucket::ALL {
            if bucket != from && bucket != to {
                prop_assert_eq!(&mapper.bucket(bucket).to_vec(), &before[bucket_position(bucket)]);
            }
        }
    }
}

fn bucket_position(bucket: Bucket) -> usize {
    Bucket::ALL
        .iter()
        .position(|b| *b == bucket)
        .expect("bucket listed")
}
