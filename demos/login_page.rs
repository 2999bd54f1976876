//! Login page object demonstration.
//!
//! Demonstrates:
//! - Declaring page classes with inherited content
//! - Attribute-based finds folded into CSS
//! - Cached, optional and waiting content
//! - Navigation relative to a base URL
//!
//! Runs against the in-memory driver, no browser needed.
//!
//! Usage:
//!   cargo run --example login_page
//!   cargo run --example login_page -- --debug

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use kebab::driver::memory::{MemoryDriver, MemoryNode};
use kebab::{
    AttributePredicates, Browser, Configuration, ContentDsl, FactoryOutput, Locator, PageClass,
    Result, TemplateParams,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Page Classes
// ============================================================================

static BASE: PageClass = PageClass::new("BasePage").content(declare_base);

static LOGIN: PageClass = PageClass::new("LoginPage")
    .extends(&BASE)
    .url("login")
    .content(declare_login);

fn declare_base(dsl: &mut ContentDsl) {
    dsl.content("heading", TemplateParams::new(), |ctx| async move {
        Ok(ctx.find("h1").await?.into())
    })
    .content("banner", TemplateParams::new().required(false), |ctx| async move {
        Ok(ctx.find(".banner").await?.into())
    });
}

fn declare_login(dsl: &mut ContentDsl) {
    dsl.content("username", TemplateParams::new().cache(true), |ctx| async move {
        let attrs = AttributePredicates::from([("name", "username")]);
        Ok(ctx.find_matching(attrs, "input").await?.into())
    })
    .content("submit", TemplateParams::new(), |ctx| async move {
        let attrs = AttributePredicates::from([("type", "submit"), ("text", "Sign in")]);
        Ok(ctx.find_with(attrs).await?.into())
    })
    .content("notice", TemplateParams::new().wait("quick"), |ctx| async move {
        Ok(ctx.find("#notice").await?.into())
    })
    .content("field_count", TemplateParams::new(), |ctx| async move {
        Ok(FactoryOutput::Value(json!(ctx.find("input").await?.len())))
    });
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let debug = std::env::args().any(|a| a == "--debug");
    init_logging(debug);

    if let Err(e) = run().await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let filter = if debug { "kebab=debug" } else { "kebab=info" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

async fn run() -> Result<()> {
    println!("=== Login Page ===\n");

    // ========================================================================
    // Setup
    // ========================================================================

    let driver = Arc::new(MemoryDriver::with_document([
        MemoryNode::new("h1").with_text("Sign in"),
        MemoryNode::new("input")
            .with_attribute("name", "username")
            .with_attribute("type", "text"),
        MemoryNode::new("input")
            .with_attribute("name", "password")
            .with_attribute("type", "password"),
        MemoryNode::new("button")
            .with_attribute("type", "submit")
            .with_text("Sign in"),
    ]));
    driver.insert_after_queries(3, MemoryNode::new("div").with_attribute("id", "notice"));

    let config = Configuration::builder()
        .base_url("http://localhost:8080/app/")
        .wait_preset("quick", 2.0, 0.1)
        .build()?;
    let browser = Browser::new(Arc::clone(&driver) as Arc<dyn kebab::Driver>, config)?;

    // ========================================================================
    // Navigate
    // ========================================================================

    println!("[1] to(LoginPage)");
    let page = browser.to(&LOGIN, [("next", "/home")]).await?;
    println!("    Navigated: {:?}", driver.navigations());
    println!("    Content: {:?}\n", page.content_names());

    // ========================================================================
    // Content
    // ========================================================================

    println!("[2] Inherited and declared content");
    let heading = page.content("heading", ()).await?;
    println!("    heading: {:?}", heading.navigator().map(|n| n.len()));

    let banner = page.content("banner", ()).await?;
    println!("    banner present: {}", banner.is_present());

    let first = page.content("username", ()).await?;
    let again = page.content("username", ()).await?;
    println!("    username cached: {}", Arc::ptr_eq(&first, &again));

    let submit = page.content("submit", ()).await?;
    if let Some(button) = submit.navigator() {
        button.click().await?;
        println!("    submit clicked");
    }

    let fields = page.content("field_count", ()).await?;
    println!("    field_count: {:?}\n", fields.value());

    // ========================================================================
    // Waiting
    // ========================================================================

    println!("[3] Waiting content");
    let notice = page.content("notice", ()).await?;
    println!("    notice present: {}", notice.is_present());
    println!("    queries issued: {}\n", driver.query_count());

    browser.quit().await?;
    println!("=== Done ===");
    Ok(())
}
