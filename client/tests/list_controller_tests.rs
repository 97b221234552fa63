//! Entity list controller tests
//!
//! Tests for page accumulation, filter resets, stale replies, failure
//! handling and the searched/sorted view.

mod support;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use proptest::prelude::*;
use rust_decimal::Decimal;
use salon_inventory::{
    ApplyOutcome, ClientError, ClientResult, EntityListController, NotificationQueue, PageSource,
    Severity,
};
use shared::{
    Id, Language, Material, MaterialCategory, MaterialFilter, MaterialSortKey, Page, SortOrder,
    SupplierBrief,
};

// ============================================================================
// In-memory source
// ============================================================================

struct MemorySource {
    items: Vec<Material>,
    page_size: usize,
    calls: Arc<Mutex<Vec<(u32, MaterialFilter)>>>,
    failing: Arc<Mutex<bool>>,
}

impl MemorySource {
    fn new(items: Vec<Material>, page_size: usize) -> Self {
        Self {
            items,
            page_size,
            calls: Arc::default(),
            failing: Arc::default(),
        }
    }
}

#[async_trait]
impl PageSource for MemorySource {
    type Item = Material;
    type Filter = MaterialFilter;

    fn collection(&self) -> &'static str {
        "materials"
    }

    async fn fetch_page(&self, page: u32, filters: &MaterialFilter) -> ClientResult<Page<Material>> {
        self.calls.lock().unwrap().push((page, filters.clone()));
        if *self.failing.lock().unwrap() {
            return Err(ClientError::Status {
                status: 503,
                message: "maintenance".into(),
            });
        }
        let matching: Vec<Material> = self
            .items
            .iter()
            .filter(|m| filters.category.map_or(true, |c| m.category == c))
            .cloned()
            .collect();
        let total = matching.len();
        let content: Vec<Material> = matching
            .into_iter()
            .skip(page as usize * self.page_size)
            .take(self.page_size)
            .collect();
        let seen = (page as usize + 1) * self.page_size;
        Ok(Page {
            content,
            page,
            size: self.page_size as u32,
            total_elements: total as u64,
            total_pages: ((total + self.page_size - 1) / self.page_size) as u32,
            has_next: seen < total,
        })
    }
}

fn material(id: Id, name: &str, price: i64, category: MaterialCategory) -> Material {
    let mut m = support::material(id, name, 5);
    m.price = Decimal::from(price);
    m.category = category;
    m
}

fn catalogue() -> Vec<Material> {
    vec![
        material(1, "Shampoo Pro", 300, MaterialCategory::HairCare),
        material(2, "Nail polish", 120, MaterialCategory::NailCare),
        material(3, "Hair mask", 450, MaterialCategory::HairCare),
        material(4, "Scissors", 900, MaterialCategory::Tools),
        material(5, "Face cream", 200, MaterialCategory::SkinCare),
    ]
}

fn controller(
    source: MemorySource,
) -> (EntityListController<MemorySource>, NotificationQueue) {
    let queue = NotificationQueue::new();
    let list = EntityListController::new(source, Arc::new(queue.clone()), Language::English);
    (list, queue)
}

fn ids(items: &[Material]) -> Vec<Id> {
    items.iter().map(|m| m.id).collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[tokio::test]
async fn test_load_more_accumulates_until_last_page() {
    let (mut list, _) = controller(MemorySource::new(catalogue(), 2));

    assert_eq!(list.load_more().await, ApplyOutcome::Skipped);
    assert_eq!(list.refresh().await, ApplyOutcome::Applied);
    assert_eq!(ids(list.items()), vec![1, 2]);
    assert!(list.has_next());

    assert_eq!(list.load_more().await, ApplyOutcome::Applied);
    assert_eq!(list.load_more().await, ApplyOutcome::Applied);
    assert_eq!(ids(list.items()), vec![1, 2, 3, 4, 5]);
    assert_eq!(list.page(), 2);
    assert!(!list.has_next());

    let calls = list.source().calls.lock().unwrap().len();
    assert_eq!(list.load_more().await, ApplyOutcome::Skipped);
    assert_eq!(list.source().calls.lock().unwrap().len(), calls);
}

#[tokio::test]
async fn test_page_zero_replaces_instead_of_appending() {
    let (mut list, _) = controller(MemorySource::new(catalogue(), 2));

    list.refresh().await;
    list.load_more().await;
    assert_eq!(list.items().len(), 4);

    list.refresh().await;
    assert_eq!(ids(list.items()), vec![1, 2]);
    assert_eq!(list.page(), 0);
}

#[tokio::test]
async fn test_filter_change_resets_and_refetches_page_zero() {
    let (mut list, _) = controller(MemorySource::new(catalogue(), 2));
    list.refresh().await;
    list.load_more().await;

    let filters = MaterialFilter {
        category: Some(MaterialCategory::HairCare),
        ..MaterialFilter::default()
    };
    let ticket = list.begin_filter_change(filters.clone()).unwrap();
    assert!(list.items().is_empty());
    assert!(!list.has_next());
    assert_eq!(ticket.page, 0);

    let source = list.source();
    let result = ticket.execute(source.as_ref()).await;
    assert_eq!(list.apply(ticket, result), ApplyOutcome::Applied);
    assert_eq!(ids(list.items()), vec![1, 3]);

    let last = source.calls.lock().unwrap().last().cloned().unwrap();
    assert_eq!(last, (0, filters.clone()));

    assert_eq!(list.set_filters(filters).await, ApplyOutcome::Skipped);
}

#[tokio::test]
async fn test_reply_from_older_generation_is_dropped() {
    let (mut list, _) = controller(MemorySource::new(catalogue(), 2));
    let source = list.source();

    let old = list.begin_fetch(0);
    let old_result = old.execute(source.as_ref()).await;

    let newer = list
        .begin_filter_change(MaterialFilter {
            category: Some(MaterialCategory::Tools),
            ..MaterialFilter::default()
        })
        .unwrap();
    let newer_result = newer.execute(source.as_ref()).await;

    assert_eq!(list.apply(newer, newer_result), ApplyOutcome::Applied);
    assert_eq!(list.apply(old, old_result), ApplyOutcome::Stale);
    assert_eq!(ids(list.items()), vec![4]);
}

#[tokio::test]
async fn test_duplicate_next_page_reply_is_not_appended_twice() {
    let (mut list, _) = controller(MemorySource::new(catalogue(), 2));
    list.refresh().await;
    let source = list.source();

    let first = list.begin_load_more().unwrap();
    let second = list.begin_load_more().unwrap();
    assert_eq!(first.page, second.page);

    let r1 = first.execute(source.as_ref()).await;
    let r2 = second.execute(source.as_ref()).await;
    assert_eq!(list.apply(first, r1), ApplyOutcome::Applied);
    assert_eq!(list.apply(second, r2), ApplyOutcome::Stale);
    assert_eq!(ids(list.items()), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_failed_fetch_notifies_and_keeps_state() {
    let (mut list, queue) = controller(MemorySource::new(catalogue(), 2));
    list.refresh().await;
    let failing = Arc::clone(&list.source().failing);

    *failing.lock().unwrap() = true;
    assert_eq!(list.load_more().await, ApplyOutcome::Failed);
    assert_eq!(ids(list.items()), vec![1, 2]);
    assert_eq!(list.page(), 0);
    assert!(list.has_next());

    let notes = queue.drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Error);
    assert_eq!(notes[0].code.as_deref(), Some("BACKEND_ERROR"));
    assert!(!notes[0].message.contains("maintenance"));

    *failing.lock().unwrap() = false;
    assert_eq!(list.load_more().await, ApplyOutcome::Applied);
    assert_eq!(ids(list.items()), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_view_searches_then_sorts_all_pages() {
    let mut items = catalogue();
    items[0].suppliers.push(SupplierBrief {
        id: 9,
        name: "RedCo".into(),
        rating: 4.0,
    });
    items[2].suppliers.push(SupplierBrief {
        id: 9,
        name: "RedCo".into(),
        rating: 4.0,
    });
    let (mut list, _) = controller(MemorySource::new(items, 2));
    list.refresh().await;
    list.load_more().await;
    list.load_more().await;

    list.set_search("red pro");
    assert_eq!(ids(&list.view()), vec![1]);

    list.set_search("RED");
    list.set_sort(MaterialSortKey::Price, SortOrder::Desc);
    assert_eq!(ids(&list.view()), vec![3, 1]);

    list.set_search("");
    list.toggle_sort(MaterialSortKey::Price);
    assert_eq!(list.sort(), Some((MaterialSortKey::Price, SortOrder::Asc)));
    assert_eq!(ids(&list.view()), vec![2, 5, 1, 3, 4]);

    // the collection itself stays in server order
    assert_eq!(ids(list.items()), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_sort_options_are_localized() {
    let (list, _) = controller(MemorySource::new(Vec::new(), 2));
    let options = list.sort_options();
    assert_eq!(options[0], ("quantity", "Capacity"));
    assert_eq!(options.len(), 3);
}

// ============================================================================
// Over HTTP
// ============================================================================

#[tokio::test]
async fn test_controller_over_material_service() {
    let backend = support::FakeBackend::start(
        support::FakeState::new()
            .with_material(support::material(1, "Shampoo", 4))
            .with_material(support::material(2, "Mask", 0))
            .with_material(support::material(3, "Dye", 12)),
    )
    .await;
    let (services, _) = backend.signed_in(support::EMPLOYEE_EMAIL).await;

    let queue = NotificationQueue::new();
    let mut list = EntityListController::new(
        services.materials.clone(),
        Arc::new(queue.clone()),
        Language::Ukrainian,
    );
    assert_eq!(list.refresh().await, ApplyOutcome::Applied);
    assert_eq!(list.total_elements(), 3);
    assert!(list.has_next());
    assert_eq!(list.load_more().await, ApplyOutcome::Applied);
    assert_eq!(ids(list.items()), vec![1, 2, 3]);
    assert!(queue.snapshot().is_empty());

    assert_eq!(
        backend.backend_calls(),
        vec!["GET /materials?page=0", "GET /materials?page=1"]
    );
}

#[tokio::test]
async fn test_unauthorized_list_clears_session() {
    let backend = support::FakeBackend::start(
        support::FakeState::new().with_material(support::material(1, "Shampoo", 4)),
    )
    .await;
    let (services, session) = backend.signed_in(support::EMPLOYEE_EMAIL).await;
    backend.state.lock().unwrap().revoke_tokens = true;

    let queue = NotificationQueue::new();
    let mut list = EntityListController::new(services.materials.clone(), Arc::new(queue.clone()), Language::Ukrainian);
    assert_eq!(list.refresh().await, ApplyOutcome::Failed);
    assert!(!session.is_active());
    assert_eq!(queue.snapshot()[0].code.as_deref(), Some("SESSION_EXPIRED"));
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn run<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Loading every page yields the whole collection, in order, once
        #[test]
        fn prop_accumulation_yields_every_item_once(
            count in 0usize..30,
            page_size in 1usize..7
        ) {
            let items: Vec<Material> = (1..=count as Id)
                .map(|id| material(id, "item", id, MaterialCategory::Other))
                .collect();
            let expected: Vec<Id> = ids(&items);

            let (loaded, fetches) = run(async move {
                let (mut list, _) = controller(MemorySource::new(items, page_size));
                list.refresh().await;
                while list.has_next() {
                    list.load_more().await;
                }
                let fetches = list.source().calls.lock().unwrap().len();
                (ids(list.items()), fetches)
            });

            prop_assert_eq!(loaded, expected);
            prop_assert_eq!(fetches, std::cmp::max(1, (count + page_size - 1) / page_size));
        }
    }
}
