//! Lookup handlers: search, near, insights

use crate::cli::output::*;
use crate::links;
use crate::models::QueryOrigin;
use crate::models::RawQuery;
use crate::services::PincodeServices;
use crate::Result;

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn handle_search_command(
    services: &PincodeServices,
    query: &[String],
    ai: bool,
    voice: bool,
    json: bool,
) -> Result<()> {
    let origin = if voice {
        QueryOrigin::Voice
    } else {
        QueryOrigin::Typed
    };
    let raw = RawQuery::new(&query.join(" "), origin)?;
    let force_ai = ai || origin.forces_ai();

    if !json && services.pipeline.normalizer().will_call_model(raw.text(), force_ai) {
        print_info("Asking the AI normalizer to interpret your query...");
    }

    let resolution = services.pipeline.resolve(raw.text(), force_ai).await;
    if json {
        return print_json(&resolution);
    }

    print_resolution(&resolution);
    if resolution.results.is_empty() {
        print_warning("No post offices matched. Try a 6-digit pincode or add --ai.");
    }
    Ok(())
}

pub async fn handle_near_command(services: &PincodeServices, lat: f64, lon: f64, json: bool) -> Result<()> {
    if !json {
        print_info(&format!("Locating ({lat}, {lon})..."));
    }

    match services.pipeline.resolve_coordinates(lat, lon).await {
        Some(resolution) if json => print_json(&resolution),
        Some(resolution) => {
            print_resolution(&resolution);
            Ok(())
        }
        None => {
            print_error("Could not determine a locality for these coordinates");
            Ok(())
        }
    }
}

pub fn handle_share_location_command(lat: f64, lon: f64, json: bool) -> Result<()> {
    let links = links::location_links(lat, lon)?;
    if json {
        return print_json(&links);
    }

    print_success(&format!("Live location ({lat}, {lon})"));
    println!("  🗺️  Map:      {}", links.maps);
    println!("  💬 WhatsApp: {}", links.share);
    Ok(())
}

pub async fn handle_insights_command(
    services: &PincodeServices,
    query: &[String],
    index: usize,
    json: bool,
) -> Result<()> {
    let raw = RawQuery::typed(&query.join(" "))?;
    let resolution = services.pipeline.resolve_query(&raw).await;

    let Some(record) = resolution.results.records.get(index) else {
        if resolution.results.is_empty() {
            print_error(resolution.results.context());
        } else {
            print_error(&format!(
                "Result index {index} out of range ({} results)",
                resolution.results.len()
            ));
            print_record_list(&resolution.results.records);
        }
        return Ok(());
    };

    if !json {
        print_info(&format!(
            "Fetching locality insights for {} ({})...",
            record.office_name, record.pincode
        ));
    }

    match services.insights.fetch_for_record(record).await {
        Some(report) if json => print_json(&report),
        Some(report) => {
            println!();
            print_insight_report(record, &report);
            Ok(())
        }
        None => {
            print_error("Locality insights are unavailable right now");
            Ok(())
        }
    }
}
