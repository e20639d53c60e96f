//! End-to-end detection scenarios over in-memory pages.

use std::sync::Arc;
use std::time::Duration;

use cardshot_core::{
    DetectionOptions, DetectorConfig, ElementHandle, Error, Rect, Result, Selector, Viewport,
};
use cardshot_detector::{
    CandidateCollector, CardDetector, DocumentQuery, MemoryDocument, NodeSpec, PatternStrategy,
    ValidityFilter,
};

const EPSILON: f64 = 1e-9;

fn page(children: Vec<NodeSpec>) -> MemoryDocument {
    MemoryDocument::new(
        Viewport::new(1280.0, 800.0),
        NodeSpec::new("body").with_children(children),
    )
}

async fn ready<D: DocumentQuery>(doc: D) -> CardDetector<D> {
    let detector = CardDetector::new(doc).with_stage_delay(Duration::ZERO);
    detector.warm_up().await.unwrap();
    detector
}

fn options() -> DetectionOptions {
    DetectionOptions::new()
        .with_min_score(0.3)
        .with_min_size(100.0, 100.0)
}

#[tokio::test]
async fn test_product_cards_are_detected() {
    let cards = (0..5)
        .map(|i| {
            NodeSpec::new("div")
                .with_class("product-card")
                .with_rect(f64::from(i) * 220.0, 0.0, 200.0, 300.0)
        })
        .collect();
    let detector = ready(page(cards)).await;

    let result = detector.detect_cards(&options()).unwrap();

    assert!(result.success);
    assert_eq!(result.count, 5);
    assert_eq!(result.cards.len(), 5);
    assert!(result.cards.iter().all(|card| card.score >= 0.8));
    assert!(result
        .cards
        .windows(2)
        .all(|pair| pair[0].score >= pair[1].score));
}

#[tokio::test]
async fn test_nested_card_is_dropped() {
    let doc = page(vec![NodeSpec::new("div")
        .with_id("outer")
        .with_class("card")
        .with_rect(0.0, 0.0, 500.0, 500.0)
        .with_child(
            NodeSpec::new("div")
                .with_id("inner")
                .with_class("card")
                .with_rect(10.0, 10.0, 100.0, 100.0),
        )]);
    let outer = doc.find_by_id("outer").unwrap();
    let detector = ready(doc).await;

    let result = detector.detect_cards(&options()).unwrap();

    assert_eq!(result.count, 1);
    assert_eq!(result.element_refs, vec![outer]);
    assert_eq!(result.cards[0].bbox, Rect::new(0.0, 0.0, 500.0, 500.0));
}

#[tokio::test]
async fn test_small_box_is_excluded() {
    let detector = ready(page(vec![NodeSpec::new("div")
        .with_class("box")
        .with_text("Quite enough text")
        .with_rect(0.0, 0.0, 50.0, 50.0)]))
    .await;

    let result = detector.detect_cards(&DetectionOptions::default()).unwrap();

    assert!(result.success);
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_contentless_block_is_excluded() {
    let detector = ready(page(vec![NodeSpec::new("section").with_child(
        NodeSpec::new("div")
            .with_text("abc")
            .with_rect(0.0, 0.0, 300.0, 200.0),
    )]))
    .await;

    let result = detector.detect_cards(&options()).unwrap();

    assert!(result.success);
    assert_eq!(result.count, 0);
}

fn unnamed_tile(class: &str, x: f64, height: f64) -> NodeSpec {
    NodeSpec::new("div")
        .with_class(class)
        .with_rect(x, 0.0, 250.0, height)
        .with_children(vec![
            NodeSpec::new("img"),
            NodeSpec::new("p").with_text("Short description"),
        ])
}

#[tokio::test]
async fn test_unnamed_siblings_found_by_layout() {
    let detector = ready(page(vec![NodeSpec::new("div").with_children(vec![
        unnamed_tile("", 0.0, 300.0),
        unnamed_tile("", 270.0, 300.0),
        unnamed_tile("", 540.0, 300.0),
    ])]))
    .await;

    let result = detector.detect_cards(&options()).unwrap();

    assert_eq!(result.count, 3);
    for card in &result.cards {
        // Image bonus only.
        assert!((card.score - 0.6).abs() < EPSILON, "score {}", card.score);
    }
}

#[tokio::test]
async fn test_dissimilar_unnamed_siblings_are_not_clustered() {
    let detector = ready(page(vec![NodeSpec::new("div").with_children(vec![
        unnamed_tile("alpha", 0.0, 120.0),
        unnamed_tile("beta", 270.0, 300.0),
        unnamed_tile("gamma", 540.0, 600.0),
    ])]))
    .await;

    let result = detector.detect_cards(&options()).unwrap();

    assert!(result.success);
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_unnamed_siblings_need_the_layout_strategy() {
    let doc = page(vec![NodeSpec::new("div").with_children(vec![
        unnamed_tile("", 0.0, 300.0),
        unnamed_tile("", 270.0, 300.0),
    ])]);
    let filter = ValidityFilter::new(100.0, 100.0);

    let mut without_layout = CandidateCollector::new();
    without_layout.add_strategy(Arc::new(PatternStrategy::class_names()));
    without_layout.add_strategy(Arc::new(PatternStrategy::attributes()));
    assert!(without_layout.collect(&doc, &filter).unwrap().is_empty());

    let candidates = CandidateCollector::default().collect(&doc, &filter).unwrap();
    assert_eq!(candidates.len(), 2);
}

#[tokio::test]
async fn test_not_ready_until_warm_up() {
    let detector = CardDetector::new(page(Vec::new())).with_stage_delay(Duration::ZERO);

    assert!(matches!(
        detector.detect_cards(&options()),
        Err(Error::NotReady)
    ));

    detector.warm_up().await.unwrap();
    let result = detector.detect_cards(&options()).unwrap();
    assert!(result.success);
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_explicit_zero_min_score_is_honoured() {
    let detector = ready(page(vec![NodeSpec::new("div")
        .with_class("card")
        .with_rect(0.0, 0.0, 200.0, 200.0)]))
    .await;

    let result = detector
        .detect_cards(&options().with_min_score(0.0))
        .unwrap();
    assert_eq!(result.count, 1);
}

/// Host whose layout reads always fail.
struct BrokenLayout(MemoryDocument);

impl DocumentQuery for BrokenLayout {
    fn viewport(&self) -> Viewport {
        self.0.viewport()
    }

    fn query_selector_all(&self, selector: &Selector) -> Result<Vec<ElementHandle>> {
        self.0.query_selector_all(selector)
    }

    fn tag_name(&self, element: ElementHandle) -> String {
        self.0.tag_name(element)
    }

    fn attributes(&self, element: ElementHandle) -> Vec<(String, String)> {
        self.0.attributes(element)
    }

    fn text_content(&self, element: ElementHandle) -> String {
        self.0.text_content(element)
    }

    fn bounding_rect(&self, _element: ElementHandle) -> Result<Rect> {
        Err(Error::Detection("layout unavailable".to_string()))
    }

    fn parent(&self, element: ElementHandle) -> Option<ElementHandle> {
        self.0.parent(element)
    }

    fn children(&self, element: ElementHandle) -> Vec<ElementHandle> {
        self.0.children(element)
    }
}

#[tokio::test]
async fn test_internal_failure_becomes_failure_result() {
    let doc = BrokenLayout(page(vec![NodeSpec::new("div")
        .with_class("card")
        .with_rect(0.0, 0.0, 200.0, 200.0)]));
    let detector = ready(doc).await;

    let result = detector.detect_cards(&options()).unwrap();

    assert!(!result.success);
    assert_eq!(result.count, 0);
    assert!(result.cards.is_empty());
    assert!(result.element_refs.is_empty());
    assert!(result.error.unwrap().contains("layout unavailable"));
}

#[tokio::test]
async fn test_host_without_has_support_still_detects() {
    let card = |x: f64| {
        NodeSpec::new("div")
            .with_class("card")
            .with_rect(x, 0.0, 200.0, 200.0)
    };
    let doc = page(vec![card(0.0), card(220.0)]).without_has_support();
    let detector = ready(doc).await;

    let result = detector.detect_cards(&options()).unwrap();

    assert!(result.success);
    assert_eq!(result.count, 2);
}

#[tokio::test]
async fn test_custom_selectors_from_config() {
    let doc = || {
        page(vec![NodeSpec::new("figure")
            .with_text("A captioned photo")
            .with_rect(0.0, 0.0, 300.0, 200.0)])
    };

    let plain = ready(doc()).await;
    assert_eq!(plain.detect_cards(&options()).unwrap().count, 0);

    let config = DetectorConfig::from_yaml(
        r#"
warm_up:
  stage_delay_ms: 0
patterns:
  custom_selectors:
    - figure
"#,
    )
    .unwrap();
    let custom = CardDetector::with_config(doc(), &config).unwrap();
    custom.warm_up().await.unwrap();

    let result = custom.detect_cards(&options()).unwrap();
    assert_eq!(result.count, 1);
    assert!((result.cards[0].score - 0.5).abs() < EPSILON);
}

#[tokio::test]
async fn test_count_matches_is_unique() {
    let detector = ready(page(vec![
        NodeSpec::new("div").with_class("card"),
        NodeSpec::new("div").with_class("card wide"),
        NodeSpec::new("span").with_class("card"),
    ]))
    .await;

    assert_eq!(detector.count_matches(&Selector::class("card")).unwrap(), 3);
    assert_eq!(
        detector
            .count_matches(&"div".parse::<Selector>().unwrap())
            .unwrap(),
        2
    );
}

#[tokio::test]
async fn test_result_serializes_without_element_refs() {
    let detector = ready(page(vec![NodeSpec::new("div")
        .with_class("card")
        .with_rect(0.0, 0.0, 200.0, 200.0)]))
    .await;

    let result = detector.detect_cards(&options()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 1);
    assert_eq!(json["cards"][0]["class"], "card");
    assert_eq!(json["cards"][0]["bbox"]["width"], 200.0);
    assert!(json.get("elementRefs").is_none());
    assert!(json.get("error").is_none());
}
