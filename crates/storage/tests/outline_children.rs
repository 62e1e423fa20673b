#![forbid(unsafe_code)]

mod support;

use plume_core::Counts;
use plume_storage::{SheetStore, StoreError};
use pretty_assertions::assert_eq;
use rstest::rstest;
use support::{missing_id, seed_outline};

// (title, sort_order, indent)
const MANUSCRIPT: &[(&str, i64, i64)] = &[
    ("Part I", 1, 0),
    ("Chapter 1", 2, 1),
    ("Scene 1", 3, 2),
    ("Scene 2", 4, 2),
    ("Chapter 2", 5, 1),
    ("Part II", 6, 0),
    ("Chapter 3", 7, 1),
];

#[rstest]
#[case(0, &[1, 2, 3, 4])]
#[case(1, &[2, 3])]
#[case(2, &[])]
#[case(3, &[])]
#[case(4, &[])]
#[case(5, &[6])]
#[case(6, &[])]
fn children_are_the_contiguous_deeper_run(#[case] parent: usize, #[case] expected: &[usize]) {
    let store = SheetStore::open_in_memory().expect("in-memory store should open");
    let ids = seed_outline(&store, MANUSCRIPT);

    let children = store.sheet(ids[parent]).child_ids().expect("child ids");
    let expected: Vec<_> = expected.iter().map(|index| ids[*index]).collect();
    assert_eq!(children, expected);
    assert!(!children.contains(&ids[parent]));
}

#[test]
fn four_sheet_example() {
    let store = SheetStore::open_in_memory().expect("in-memory store should open");
    let ids = seed_outline(&store, &[("A", 1, 0), ("B", 2, 1), ("C", 3, 2), ("D", 4, 0)]);

    assert_eq!(
        store.sheet(ids[0]).child_ids().expect("children of A"),
        vec![ids[1], ids[2]]
    );
    assert_eq!(
        store.sheet(ids[3]).child_ids().expect("children of D"),
        Vec::new()
    );
}

#[test]
fn child_counts_sum_descendants_but_not_the_sheet_itself() {
    let store = SheetStore::open_in_memory().expect("in-memory store should open");
    let ids = seed_outline(&store, &[("A", 1, 0), ("B", 2, 1), ("C", 3, 2), ("D", 4, 0)]);
    let counts = [
        Counts::new(100, 20),
        Counts::new(10, 2),
        Counts::new(5, 1),
        Counts::new(1000, 200),
    ];
    for (id, count) in ids.iter().zip(counts) {
        store
            .sheet(*id)
            .set_content("x", count)
            .expect("set content");
    }

    assert_eq!(
        store.sheet(ids[0]).child_counts().expect("counts of A"),
        Counts::new(15, 3)
    );
    assert_eq!(
        store.sheet(ids[3]).child_counts().expect("counts of D"),
        Counts::default()
    );
}

#[test]
fn gaps_in_sort_order_do_not_break_the_run() {
    let store = SheetStore::open_in_memory().expect("in-memory store should open");
    let ids = seed_outline(&store, &[("A", 10, 0), ("B", 20, 1), ("C", 40, 1), ("D", 90, 0)]);

    assert_eq!(
        store.sheet(ids[0]).child_ids().expect("children of A"),
        vec![ids[1], ids[2]]
    );
}

#[test]
fn versions_sharing_the_sort_order_are_not_children() {
    let store = SheetStore::open_in_memory().expect("in-memory store should open");
    let ids = seed_outline(&store, &[("A", 1, 0), ("B", 2, 1)]);
    let version = store.sheet(ids[0]).new_version(1).expect("version");

    assert_eq!(
        store.sheet(ids[0]).child_ids().expect("children of A"),
        vec![ids[1]]
    );
    assert_eq!(
        store.sheet(version).child_ids().expect("children of version"),
        vec![ids[1]]
    );
}

#[test]
fn child_enumeration_of_missing_sheet_is_not_found() {
    let store = SheetStore::open_in_memory().expect("in-memory store should open");
    let sheet = store.sheet(missing_id());
    assert!(matches!(sheet.child_ids(), Err(StoreError::NotFound)));
    assert!(matches!(sheet.child_counts(), Err(StoreError::NotFound)));
}
