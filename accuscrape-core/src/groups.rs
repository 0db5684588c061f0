//! Deterministic classification of health/activity items into fixed buckets.

use std::collections::BTreeMap;

use crate::model::{ActivityGroup, HealthActivityItem};

const ALLERGY_HEALTH_SLUGS: &[&str] = &[
    "asthma",
    "flu",
    "sinus",
    "migraine",
    "arthritis",
    "common-cold",
];
const ALLERGY_HEALTH_TYPES: &[i64] = &[21, 23, 25, 26, 27, 30, 18];
const OUTDOOR_SLUGS: &[&str] = &[
    "running",
    "hiking",
    "biking",
    "golf",
    "sun-sand",
    "astronomy",
    "fishing",
];
const TRAVEL_SLUGS: &[&str] = &["driving", "air-travel"];
const HOME_GARDEN_SLUGS: &[&str] = &["lawn-mowing", "composting"];
const ALLERGY_OTHER_SLUGS: &[&str] = &["dust-dander", "pollen"];
const ENTERTAINMENT_SLUGS: &[&str] = &["outdoor-entertaining", "entertainment"];

/// Assign an item to exactly one bucket.
///
/// Rules run in fixed priority order: explicit lifestyle-category code,
/// then the curated slug list, then the type-code list. The first
/// satisfied rule wins, so an item carrying both an allergy category code
/// and an outdoor slug still lands in allergy/health. Items matching
/// nothing fall into `Other`.
pub fn classify(item: &HealthActivityItem) -> ActivityGroup {
    let slug = item.slug.as_deref().unwrap_or("").to_lowercase();
    let slug = slug.as_str();
    let category = item.lifestyle_category;
    let kind = item.kind;

    if category == Some(1)
        || ALLERGY_HEALTH_SLUGS.contains(&slug)
        || kind.is_some_and(|k| ALLERGY_HEALTH_TYPES.contains(&k))
    {
        ActivityGroup::AllergyHealth
    } else if category == Some(2) || OUTDOOR_SLUGS.contains(&slug) {
        ActivityGroup::Outdoor
    } else if category == Some(3) || TRAVEL_SLUGS.contains(&slug) {
        ActivityGroup::Travel
    } else if category == Some(4) || HOME_GARDEN_SLUGS.contains(&slug) {
        ActivityGroup::HomeGarden
    } else if category == Some(5) || slug.contains("pest") || slug.contains("mosquito") {
        ActivityGroup::Pests
    } else if ALLERGY_OTHER_SLUGS.contains(&slug) {
        ActivityGroup::AllergyOther
    } else if ENTERTAINMENT_SLUGS.contains(&slug) {
        ActivityGroup::Entertainment
    } else {
        ActivityGroup::Other
    }
}

/// Partition items into the fixed bucket map. Every bucket is present in
/// the result, empty or not, so consumers can iterate a stable shape.
pub fn group_activities(
    items: Vec<HealthActivityItem>,
) -> BTreeMap<ActivityGroup, Vec<HealthActivityItem>> {
    let mut groups: BTreeMap<ActivityGroup, Vec<HealthActivityItem>> = ActivityGroup::all()
        .iter()
        .map(|group| (*group, Vec::new()))
        .collect();

    for item in items {
        groups.entry(classify(&item)).or_default().push(item);
    }

    groups
}
