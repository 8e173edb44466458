//! Browse handlers: states, districts and featured pincodes

use futures::future::join_all;

use crate::catalog;
use crate::cli::output::*;
use crate::models::QueryMode;
use crate::services::PincodeServices;
use crate::Result;

pub fn handle_states_command(state: Option<&str>) -> Result<()> {
    let Some(name) = state else {
        println!("🇮🇳 {} states and union territories:", catalog::states().len());
        for state in catalog::states() {
            println!("  - {state}");
        }
        return Ok(());
    };

    let Some(state) = catalog::find_state(name) else {
        print_error(&format!("Unknown state: {name}"));
        return Ok(());
    };

    match catalog::districts(state) {
        Some(districts) => {
            println!("🏛️  Districts in {state}:");
            for district in districts {
                println!("  - {district}");
            }
        }
        None => print_warning(&format!(
            "No district list for {state}; search the state name directly"
        )),
    }
    Ok(())
}

/// Look up every featured pincode concurrently
pub async fn handle_featured_command(services: &PincodeServices) -> Result<()> {
    println!("🔥 Hot zones:");
    let lookups = catalog::featured_pincodes()
        .iter()
        .map(|pincode| services.pipeline.lookup(pincode, QueryMode::Pincode));
    let responses = join_all(lookups).await;

    for (pincode, response) in catalog::featured_pincodes().iter().zip(responses) {
        match response.records.first() {
            Some(record) => println!(
                "  {pincode}  {} ({} offices)",
                record.office_name,
                response.records.len()
            ),
            None => println!("  {pincode}  (directory unavailable)"),
        }
    }
    Ok(())
}
