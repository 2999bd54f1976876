//! Page object lifecycle, end to end against the in-memory driver.

use std::sync::Arc;
use std::time::Duration;

use kebab::driver::memory::{MemoryDriver, MemoryNode};
use kebab::{
    AttributePredicates, Browser, Configuration, ContentContainer, ContentDsl, Driver, Error,
    FactoryOutput, Locator, PAGE, PageClass, SelectorQuery, TemplateArgs, TemplateParams,
    TemplateRegistry, WaitSpec,
};
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Page Classes
// ============================================================================

static LIST: PageClass = PageClass::new("ListPage")
    .url("items")
    .content(declare_list);

static FILTERED_LIST: PageClass = PageClass::new("FilteredListPage")
    .extends(&LIST)
    .url("items?filter=on")
    .content(declare_filtered);

static OTHER: PageClass = PageClass::new("OtherPage");

fn declare_list(dsl: &mut ContentDsl) {
    dsl.content("title", TemplateParams::new(), |_| async {
        Ok(FactoryOutput::Value(json!("list")))
    })
    .content("row", TemplateParams::new().cache(true), |ctx| async move {
        let index = ctx.arg_index(0)?;
        Ok(ctx.find_at("li", index).await?.into())
    })
    .content("empty", TemplateParams::new(), |ctx| async move {
        Ok(ctx.find("table").await?.into())
    })
    .content("maybe_empty", TemplateParams::new().required(false), |ctx| async move {
        Ok(ctx.find("table").await?.into())
    })
    .content("late", TemplateParams::new().wait("patient"), |ctx| async move {
        Ok(ctx.find(".late").await?.into())
    })
    .content("never", TemplateParams::new().wait("brief"), |ctx| async move {
        Ok(ctx.find(".never").await?.into())
    })
    .content(
        "never_optional",
        TemplateParams::new().wait("brief").required(false),
        |ctx| async move { Ok(ctx.find(".never").await?.into()) },
    )
    .content("vanishing", TemplateParams::new().wait("brief"), |_| async {
        Err(Error::element_not_found(".vanishing"))
    })
    .content(
        "vanishing_optional",
        TemplateParams::new().wait("brief").required(false),
        |_| async { Err(Error::element_not_found(".vanishing")) },
    )
    .content("misconfigured", TemplateParams::new().wait("missing"), |ctx| async move {
        Ok(ctx.find("li").await?.into())
    })
    .content("active_count", TemplateParams::new(), |ctx| async move {
        let active = ctx.content("active", ()).await?;
        let count = active.navigator().map_or(0, |n| n.len());
        Ok(FactoryOutput::Value(json!(count)))
    })
    .content("active", TemplateParams::new(), |ctx| async move {
        let attrs = AttributePredicates::from([("class", "active")]);
        Ok(ctx.find_with(attrs).await?.into())
    });
}

fn declare_filtered(dsl: &mut ContentDsl) {
    dsl.content("title", TemplateParams::new(), |_| async {
        Ok(FactoryOutput::Value(json!("filtered")))
    });
}

// ============================================================================
// Fixtures
// ============================================================================

fn document() -> Arc<MemoryDriver> {
    Arc::new(MemoryDriver::with_document([
        MemoryNode::new("li").with_text("one").with_attribute("class", "active"),
        MemoryNode::new("li").with_text("two"),
        MemoryNode::new("li").with_text("three").with_attribute("class", "active"),
    ]))
}

fn browser(driver: &Arc<MemoryDriver>) -> Browser {
    let config = Configuration::builder()
        .base_url("http://shop.test/")
        .wait_preset("patient", 2.0, 0.25)
        .wait_preset("brief", 0.5, 0.1)
        .build()
        .unwrap();
    Browser::new(Arc::clone(driver) as Arc<dyn Driver>, config).unwrap()
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_subclass_definition_wins() {
    let registry = TemplateRegistry::build(&FILTERED_LIST, &PAGE).unwrap();
    let title = registry.get("title").unwrap();
    assert_eq!(title.owner().name(), "FilteredListPage");
    assert!(registry.contains("row"));
}

#[test]
fn test_unrelated_boundary_rejected() {
    let err = TemplateRegistry::build(&LIST, &OTHER).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(err.to_string().contains("OtherPage"));
    assert!(err.to_string().contains("ListPage"));
}

#[tokio::test]
async fn test_inherited_content_on_subclass_page() -> anyhow::Result<()> {
    let driver = document();
    let browser = browser(&driver);
    let page = browser.to(&FILTERED_LIST, [("sort", "asc")]).await?;

    let title = page.content("title", ()).await?;
    assert_eq!(title.value(), Some(&json!("filtered")));

    let row = page.content("row", [1]).await?;
    let navigator = row
        .navigator()
        .ok_or_else(|| anyhow::anyhow!("row should be navigator content"))?;
    assert_eq!(navigator.text().await?.as_deref(), Some("two"));

    assert_eq!(
        driver.navigations(),
        vec!["http://shop.test/items?filter=on&sort=asc"]
    );
    Ok(())
}

// ============================================================================
// Resolution
// ============================================================================

#[tokio::test]
async fn test_cache_identity_per_argument_list() {
    let driver = document();
    let page = browser(&driver).at(&LIST).unwrap();

    let a = page.content("row", [0]).await.unwrap();
    let queries = driver.query_count();
    let b = page.content("row", [0]).await.unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(driver.query_count(), queries);

    let c = page.content("row", [2]).await.unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(driver.query_count(), queries + 1);
}

#[tokio::test]
async fn test_required_and_optional_empty() {
    let driver = document();
    let page = browser(&driver).at(&LIST).unwrap();

    let err = page.content("empty", ()).await.unwrap_err();
    match err {
        Error::RequiredContentNotPresent { template, args } => {
            assert_eq!(template, "content template 'empty' defined by ListPage");
            assert_eq!(args, "[]");
        }
        other => panic!("unexpected error: {other}"),
    }

    let empty = page.content("maybe_empty", ()).await.unwrap();
    assert!(empty.navigator().unwrap().is_empty());
}

#[tokio::test]
async fn test_templates_resolve_other_templates() -> anyhow::Result<()> {
    let driver = document();
    let page = browser(&driver).at(&LIST)?;
    let count = page.content("active_count", ()).await?;
    assert_eq!(count.value(), Some(&json!(2)));
    Ok(())
}

#[tokio::test]
async fn test_out_of_range_row_is_required_failure() {
    let driver = document();
    let page = browser(&driver).at(&LIST).unwrap();
    let err = page.content("row", [9]).await.unwrap_err();
    assert!(matches!(err, Error::RequiredContentNotPresent { .. }));
}

// ============================================================================
// Waiting
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_waiting_content_appears() {
    let driver = document();
    driver.insert_after_queries(3, MemoryNode::new("p").with_attribute("class", "late"));
    let page = browser(&driver).at(&LIST).unwrap();

    let start = tokio::time::Instant::now();
    let late = page.content("late", ()).await.unwrap();
    assert_eq!(late.navigator().unwrap().len(), 1);
    assert_eq!(start.elapsed(), Duration::from_millis(750));
}

#[tokio::test(start_paused = true)]
async fn test_required_wait_times_out() {
    let driver = document();
    let page = browser(&driver).at(&LIST).unwrap();

    let err = page.content("never", ()).await.unwrap_err();
    match err {
        Error::WaitTimeout {
            timeout_ms,
            attempts,
            ..
        } => {
            assert_eq!(timeout_ms, 500);
            assert_eq!(attempts, 6);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_optional_wait_returns_last_value() {
    let driver = document();
    let page = browser(&driver).at(&LIST).unwrap();

    let content = page.content("never_optional", ()).await.unwrap();
    assert!(!content.is_present());
    assert!(content.navigator().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_wait_with_only_transient_failures() {
    let driver = document();
    let page = browser(&driver).at(&LIST).unwrap();

    let content = page.content("vanishing_optional", ()).await.unwrap();
    assert!(!content.is_present());
    assert!(content.navigator().is_none());
    assert_eq!(content.value(), Some(&serde_json::Value::Null));

    let err = page.content("vanishing", ()).await.unwrap_err();
    match err {
        Error::WaitTimeout {
            timeout_ms,
            attempts,
            last_value,
        } => {
            assert_eq!(timeout_ms, 500);
            assert_eq!(attempts, 6);
            assert_eq!(last_value, None);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unknown_preset_is_configuration_error() {
    let driver = document();
    let page = browser(&driver).at(&LIST).unwrap();
    let err = page.content("misconfigured", ()).await.unwrap_err();
    assert!(err.is_configuration_error());
}

#[tokio::test(start_paused = true)]
async fn test_browser_wait_for() {
    let driver = document();
    let browser = browser(&driver);
    driver.insert_after_queries(1, MemoryNode::new("footer"));

    let footer = browser
        .wait_for(&WaitSpec::from("brief"), || browser.find("footer"))
        .await
        .unwrap();
    assert_eq!(footer.len(), 1);
}

// ============================================================================
// Forwarding
// ============================================================================

#[tokio::test]
async fn test_browser_forwards_to_current_page() {
    let driver = document();
    let browser = browser(&driver);

    let err = browser.content("title", TemplateArgs::new()).await.unwrap_err();
    assert!(matches!(err, Error::UnknownContent { .. }));

    browser.at(&LIST).unwrap();
    let title = browser.content("title", TemplateArgs::new()).await.unwrap();
    assert_eq!(title.value(), Some(&json!("list")));
}

// ============================================================================
// Selector Folding
// ============================================================================

fn arb_node() -> impl Strategy<Value = MemoryNode> {
    (
        prop::sample::select(vec!["div", "span", "input"]),
        prop::option::of(prop::sample::select(vec!["a", "b", "a b"])),
        prop::option::of(prop::sample::select(vec!["x", "y z", "q\"r"])),
        prop::sample::select(vec!["", "hello", "bye"]),
    )
        .prop_map(|(tag, class, title, text)| {
            let mut node = MemoryNode::new(tag).with_text(text);
            if let Some(class) = class {
                node = node.with_attribute("class", class);
            }
            if let Some(title) = title {
                node = node.with_attribute("title", title);
            }
            node
        })
}

fn arb_predicates() -> impl Strategy<Value = Vec<(&'static str, &'static str)>> {
    prop::collection::vec(
        prop::sample::select(vec![
            ("class", "a"),
            ("class", "a b"),
            ("title", "x"),
            ("title", "y z"),
            ("title", "q\"r"),
            ("text", "hello"),
            ("text", ""),
        ]),
        0..3,
    )
}

proptest! {
    #[test]
    fn test_folding_matches_post_filtering(
        nodes in prop::collection::vec(arb_node(), 0..8),
        predicates in arb_predicates(),
        selector in prop::sample::select(vec!["*", "div", "input"]),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(async {
            let driver = Arc::new(MemoryDriver::with_document(nodes));
            let browser = Browser::new(
                Arc::clone(&driver) as Arc<dyn Driver>,
                Configuration::default(),
            )
            .unwrap();

            let mut attrs = AttributePredicates::new();
            for (key, value) in &predicates {
                attrs.insert(*key, *value);
            }

            let folded = browser.find_matching(attrs.clone(), selector).await.unwrap();
            let unfolded = browser
                .find_by(SelectorQuery::css(selector))
                .await
                .unwrap()
                .filter(&attrs)
                .await
                .unwrap();

            let folded_ids: Vec<_> = folded.iter().map(|e| e.id().clone()).collect();
            let unfolded_ids: Vec<_> = unfolded.iter().map(|e| e.id().clone()).collect();
            prop_assert_eq!(folded_ids, unfolded_ids);
            Ok(())
        })?;
    }
}
