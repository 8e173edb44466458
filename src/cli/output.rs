//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `pincodepro` CLI

use crate::config::mask_secret;
use crate::links;
use crate::models::InsightReport;
use crate::models::PostalRecord;
use crate::models::Resolution;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// One line per record
pub fn print_record_list(records: &[PostalRecord]) {
    for (index, record) in records.iter().enumerate() {
        println!(
            "  [{index}] {} | {} | {} | {}, {}",
            record.pincode,
            truncate_str(&record.office_name, 32),
            record.office_type,
            record.district,
            record.state
        );
    }
}

/// Full detail card with outbound links
pub fn print_record_card(record: &PostalRecord) {
    println!("📮 {} ({})", record.office_name, record.office_type);
    println!("  Pincode:   {}", record.pincode);
    println!("  Delivery:  {}", record.delivery_status);
    println!("  Block:     {}", record.block);
    println!("  District:  {}", record.district);
    println!("  State:     {}", record.state);
    println!("  Division:  {}", record.division_name);
    println!("  Region:    {}", record.region_name);
    println!("  Circle:    {}", record.circle_name);

    if let Ok(url) = links::directions_url(record) {
        println!("  🧭 Directions: {url}");
    }
    if let Ok(url) = links::share_url(record) {
        println!("  💬 Share:      {url}");
    }
    let nearby = links::nearby_pincodes(&record.pincode);
    if !nearby.is_empty() {
        println!("  📍 Nearby:     {}", nearby.join(", "));
    }
}

pub fn print_resolution(resolution: &Resolution) {
    let query = &resolution.query;
    println!(
        "🔎 Searched {} '{}'",
        query.mode, query.canonical_term
    );
    if !resolution.results.context().is_empty() {
        println!("💡 {}", resolution.results.context());
    }
    println!();

    if let Some(record) = &resolution.auto_open {
        print_record_card(record);
    } else if !resolution.results.is_empty() {
        println!("Found {} post offices:", resolution.results.len());
        print_record_list(&resolution.results.records);
    }
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{title}");
    for item in items {
        println!("  - {item}");
    }
}

pub fn print_insight_report(record: &PostalRecord, report: &InsightReport) {
    println!("🏙️  {} ({}), {}", record.office_name, record.pincode, record.state);
    println!();
    println!("{}", report.insights.summary);
    println!();
    println!("🚇 Connectivity: {}", report.insights.connectivity);
    print_list("📍 Key places:", &report.insights.key_places);
    print_list("⭐ Popular for:", &report.insights.popular_for);
    print_list("🏥 Hospitals:", &report.insights.hospitals);
    print_list("🏫 Schools:", &report.insights.schools);

    if !report.sources.is_empty() {
        println!("📚 Sources:");
        for source in &report.sources {
            println!("  - {} <{}>", source.title, source.uri);
        }
    }
}

pub fn print_config(config: &AppConfig) {
    println!("📋 PincodePro Configuration:");
    println!();

    println!("📮 Directory:");
    println!("  Endpoint: {}", config.directory_endpoint());
    println!("  Timeout: {}s", config.directory.timeout_secs);
    println!();

    println!("🗺️  Reverse geocoder:");
    println!("  Endpoint: {}", config.geocoder_endpoint());
    println!("  User agent: {}", config.geocoder.user_agent);
    println!();

    println!("🤖 LLM:");
    println!("  Endpoint: {}", config.llm_endpoint());
    println!(
        "  Key: {}",
        config
            .llm_key()
            .map_or_else(|| "(not set)".to_string(), |key| mask_secret(&key))
    );
    println!("  Normalizer model: {}", config.llm.normalizer_model);
    println!("  Insight model: {}", config.llm.insight_model);
    println!("  Support model: {}", config.llm.support_model);
    println!();

    println!("⚙️  Pipeline:");
    println!("  Multi-word heuristic: {}", config.pipeline.multi_word_heuristic);
    println!("  Min tokens: {}", config.pipeline.min_tokens);
    println!("  Resolve timeout: {}s", config.pipeline.resolve_timeout_secs);
    println!(
        "  Retry: {} attempts, {}ms base delay",
        config.retry.max_attempts, config.retry.base_delay_ms
    );
    println!();

    println!("🌐 Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!("  CORS: {}", config.server.enable_cors);
    println!("  Session timeout: {}s", config.server.session_timeout_secs);
}

pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    println!("❌ {msg}");
}

pub fn print_prompt(msg: &str) {
    print!("{msg}");
    let _ = std::io::Write::flush(&mut std::io::stdout());
}
