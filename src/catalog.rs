//! Static browse data: states, major districts, featured pincodes and the
//! records a fresh session starts with.

use crate::models::PostalRecord;

pub const INDIAN_STATES: &[&str] = &[
    "Andaman and Nicobar Islands",
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chandigarh",
    "Chhattisgarh",
    "Dadra and Nagar Haveli",
    "Daman and Diu",
    "Delhi",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jammu and Kashmir",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Ladakh",
    "Lakshadweep",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Puducherry",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
];

/// Major districts per state. States not listed have no browse data.
const STATE_DISTRICTS: &[(&str, &[&str])] = &[
    (
        "Andhra Pradesh",
        &[
            "Anantapur",
            "Chittoor",
            "East Godavari",
            "Guntur",
            "Krishna",
            "Kurnool",
            "Nellore",
            "Prakasam",
            "Srikakulam",
            "Visakhapatnam",
            "Vizianagaram",
            "West Godavari",
            "YSR Kadapa",
        ],
    ),
    (
        "Maharashtra",
        &[
            "Mumbai",
            "Pune",
            "Nagpur",
            "Thane",
            "Nashik",
            "Aurangabad",
            "Solapur",
            "Amravati",
            "Kolhapur",
            "Sangli",
        ],
    ),
    (
        "Karnataka",
        &[
            "Bangalore",
            "Mysore",
            "Hubli",
            "Mangalore",
            "Belgaum",
            "Dharwad",
            "Gulbarga",
            "Shimoga",
        ],
    ),
    (
        "Tamil Nadu",
        &[
            "Chennai",
            "Coimbatore",
            "Madurai",
            "Tiruchirappalli",
            "Salem",
            "Tiruppur",
            "Erode",
            "Vellore",
        ],
    ),
    (
        "Telangana",
        &[
            "Hyderabad",
            "Warangal",
            "Nizamabad",
            "Karimnagar",
            "Ramagundam",
            "Khammam",
            "Mahbubnagar",
        ],
    ),
    (
        "Uttar Pradesh",
        &[
            "Lucknow",
            "Kanpur",
            "Ghaziabad",
            "Agra",
            "Meerut",
            "Varanasi",
            "Prayagraj",
            "Bareilly",
            "Aligarh",
        ],
    ),
    (
        "West Bengal",
        &[
            "Kolkata",
            "Howrah",
            "Darjeeling",
            "Asansol",
            "Siliguri",
            "Durgapur",
            "Bardhaman",
        ],
    ),
    (
        "Gujarat",
        &[
            "Ahmedabad",
            "Surat",
            "Vadodara",
            "Rajkot",
            "Bhavnagar",
            "Jamnagar",
            "Gandhinagar",
        ],
    ),
    (
        "Delhi",
        &[
            "Central Delhi",
            "East Delhi",
            "New Delhi",
            "North Delhi",
            "South Delhi",
            "West Delhi",
        ],
    ),
];

/// Pincodes shown as quick searches
pub const FEATURED_PINCODES: &[&str] = &["560001", "400001", "110001", "600001"];

#[must_use]
pub fn states() -> &'static [&'static str] {
    INDIAN_STATES
}

/// Canonical state name for a case-insensitive match
#[must_use]
pub fn find_state(name: &str) -> Option<&'static str> {
    let name = name.trim();
    INDIAN_STATES
        .iter()
        .copied()
        .find(|state| state.eq_ignore_ascii_case(name))
}

/// Districts with browse data for a state; `None` for unknown states or
/// states without a district list.
#[must_use]
pub fn districts(state: &str) -> Option<&'static [&'static str]> {
    let state = find_state(state)?;
    STATE_DISTRICTS
        .iter()
        .find(|(name, _)| *name == state)
        .map(|(_, districts)| *districts)
}

#[must_use]
pub fn featured_pincodes() -> &'static [&'static str] {
    FEATURED_PINCODES
}

#[allow(clippy::too_many_arguments)]
fn sample(
    pincode: &str,
    office_name: &str,
    office_type: &str,
    district: &str,
    state: &str,
    division_name: &str,
    region_name: &str,
    circle_name: &str,
    block: &str,
) -> PostalRecord {
    PostalRecord {
        pincode: pincode.to_string(),
        office_name: office_name.to_string(),
        office_type: office_type.to_string(),
        delivery_status: "Delivery".to_string(),
        division_name: division_name.to_string(),
        region_name: region_name.to_string(),
        circle_name: circle_name.to_string(),
        district: district.to_string(),
        state: state.to_string(),
        block: block.to_string(),
    }
}

/// Head offices of the metro cities, shown before the first search
#[must_use]
pub fn sample_records() -> Vec<PostalRecord> {
    vec![
        sample("110001", "Connaught Place", "H.O", "Central Delhi", "Delhi", "Delhi Central", "Delhi", "Delhi", "New Delhi"),
        sample("400001", "Mumbai G.P.O.", "G.P.O", "Mumbai", "Maharashtra", "Mumbai City", "Mumbai", "Maharashtra", "Mumbai"),
        sample("560001", "Bangalore G.P.O.", "G.P.O", "Bangalore", "Karnataka", "Bangalore East", "Bangalore HQ", "Karnataka", "Bangalore North"),
        sample("600001", "Chennai G.P.O.", "G.P.O", "Chennai", "Tamil Nadu", "Chennai City Central", "Chennai Region", "Tamil Nadu", "Chennai"),
        sample("700001", "Kolkata G.P.O.", "G.P.O", "Kolkata", "West Bengal", "Kolkata Central", "Kolkata", "West Bengal", "Kolkata"),
        sample("500001", "Hyderabad G.P.O.", "G.P.O", "Hyderabad", "Telangana", "Hyderabad City", "Hyderabad", "Andhra Pradesh", "Hyderabad"),
    ]
}
