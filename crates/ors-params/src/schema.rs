//! # openrouteservice Parameter Schema
//!
//! Rule table for every request parameter the client accepts across the
//! directions, isochrones, matrix, geocoding, places, elevation and
//! optimization endpoints.
//!
//! The table is built once, on first use, and is read-only afterwards.
//! [`ors_parameters`] hands out a `&'static` reference that can be shared
//! across threads without locking.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;

use crate::rule::{Kind, Rule};

/// Mapping from parameter name to its rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterSchema {
    rules: BTreeMap<String, Rule>,
}

impl ParameterSchema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the rule for `name`.
    pub fn insert(&mut self, name: impl Into<String>, rule: Rule) -> Option<Rule> {
        self.rules.insert(name.into(), rule)
    }

    /// Look up the rule for a parameter.
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Whether the schema declares `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Returns the number of declared parameters.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no parameters are declared.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Declared parameter names, sorted alphabetically.
    pub fn names(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    /// Iterate `(name, rule)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }
}

/// The process-wide openrouteservice parameter schema.
pub fn ors_parameters() -> &'static ParameterSchema {
    static SCHEMA: OnceLock<ParameterSchema> = OnceLock::new();
    SCHEMA.get_or_init(build_ors_parameters)
}

const BOOLEAN_STRINGS: [&str; 2] = ["true", "false"];

fn string() -> Rule {
    Rule::of(Kind::String)
}

fn integer() -> Rule {
    Rule::of(Kind::Integer)
}

fn float() -> Rule {
    Rule::of(Kind::Float)
}

/// String flag serialized as `"true"`/`"false"` on the wire.
fn flag() -> Rule {
    string().allowed(BOOLEAN_STRINGS)
}

fn one_of_strings<const N: usize>(values: [&str; N]) -> Rule {
    string().allowed(values)
}

fn list_of(rule: Rule) -> Rule {
    Rule::of(Kind::List).items(rule)
}

fn sequence_of(rule: Rule) -> Rule {
    Rule::of_kinds([Kind::List, Kind::Tuple]).items(rule)
}

/// A single point, a list of points, or a tuple of point tuples.
fn points() -> Rule {
    Rule::any_of([
        sequence_of(float()),
        list_of(list_of(float())),
        Rule::of(Kind::Tuple).items(Rule::of(Kind::Tuple).items(float())),
    ])
}

fn factor() -> Rule {
    Rule::of(Kind::Dict).fields([("factor", float().min(0.0).max(1.0))])
}

fn build_ors_parameters() -> ParameterSchema {
    let mut s = ParameterSchema::new();

    s.insert("address", string());
    s.insert(
        "attributes",
        sequence_of(one_of_strings([
            "area",
            "reachfactor",
            "total_pop",
            "avgspeed",
            "detourfactor",
            "percentage",
        ])),
    );
    s.insert("bearings", sequence_of(list_of(integer())));
    s.insert("borough", string());
    s.insert("category_group_ids", list_of(integer()));
    s.insert("circle_radius", integer());
    s.insert("circle_point", Rule::of_kinds([Kind::Tuple, Kind::Float]));
    s.insert("continue_straight", flag());
    s.insert("coordinates", points());
    s.insert("country", string());
    s.insert("county", string());
    s.insert(
        "destinations",
        Rule::one_of([list_of(integer()), one_of_strings(["all"])]),
    );
    s.insert("dry_run", flag());
    s.insert("elevation", flag());
    s.insert(
        "extra_info",
        sequence_of(one_of_strings([
            "steepness",
            "suitability",
            "surface",
            "waycategory",
            "waytype",
            "tollways",
            "traildifficulty",
        ])),
    );
    s.insert("filter_category_ids", list_of(integer()));
    s.insert(
        "filters_custom",
        Rule::of(Kind::Dict).fields([
            ("name", list_of(string())),
            (
                "wheelchair",
                list_of(one_of_strings(["yes", "limited", "no", "designated"])),
            ),
            (
                "smoking",
                list_of(one_of_strings([
                    "dedicated",
                    "yes",
                    "separated",
                    "isolated",
                    "no",
                    "outside",
                ])),
            ),
            ("fee", list_of(one_of_strings(["yes", "no", "str"]))),
        ]),
    );
    s.insert("focus_point", sequence_of(float()));
    s.insert("format", one_of_strings(["json", "geojson", "gpx"]));
    s.insert("geometry", flag());
    s.insert(
        "geometry_format",
        one_of_strings(["encodedpolyline", "geojson", "polyline"]),
    );
    s.insert("geometry_simplify", flag());
    s.insert("id", string());
    s.insert("instructions", flag());
    s.insert("instructions_format", one_of_strings(["text", "html"]));
    s.insert("intersections", flag());
    s.insert("interval", list_of(integer()));
    s.insert(
        "language",
        one_of_strings([
            "en", "de", "cn", "es", "ru", "dk", "fr", "it", "nl", "br", "se", "tr", "gr",
        ]),
    );
    s.insert("layers", list_of(string()));
    s.insert("locality", string());
    s.insert("location_type", one_of_strings(["start", "destination"]));
    s.insert("locations", points());
    s.insert("limit", integer());
    s.insert("maneuvers", flag());
    s.insert(
        "metrics",
        list_of(string()).allowed(["distance", "duration"]),
    );
    s.insert("neighbourhood", string());
    s.insert("optimized", flag());
    s.insert(
        "options",
        Rule::of(Kind::Dict).fields([
            ("maximum_speed", integer()),
            (
                "avoid_features",
                one_of_strings([
                    "highways",
                    "tollways",
                    "ferries",
                    "tunnels",
                    "pavedroads",
                    "unpavedroads",
                    "tracks",
                    "fords",
                    "steps",
                    "hills",
                ]),
            ),
            ("avoid_borders", one_of_strings(["all", "controlled"])),
            ("avoid_countries", string()),
            (
                "vehicle_type",
                one_of_strings([
                    "hgv",
                    "bus",
                    "agricultural",
                    "delivery",
                    "forestry",
                    "goods",
                ]),
            ),
            (
                "profile_params",
                Rule::of(Kind::Dict).fields([(
                    "weightings",
                    Rule::of(Kind::Dict).fields([
                        (
                            "steepness_difficulty",
                            Rule::of(Kind::Dict)
                                .fields([("level", integer().min(0.0).max(3.0))]),
                        ),
                        ("green", factor()),
                        ("quiet", factor()),
                    ]),
                )]),
            ),
        ]),
    );
    s.insert("point", points());
    s.insert("polyline", string());
    s.insert("post_json", Rule::of(Kind::Dict));
    s.insert("postalcode", string());
    s.insert(
        "profile",
        one_of_strings([
            "driving-car",
            "driving-hgv",
            "foot-walking",
            "foot-hiking",
            "cycling-regular",
            "cycling-road",
            "cycling-safe",
            "cycling-mountain",
            "cycling-tour",
            "cycling-electric",
        ]),
    );
    s.insert(
        "preference",
        one_of_strings(["fastest", "shortest", "recommended"]),
    );
    s.insert(
        "radiuses",
        sequence_of(Rule::one_of([
            float().allowed([-1]),
            float().min(0.0),
        ])),
    );
    s.insert("range_type", one_of_strings(["time", "distance"]));
    s.insert("range", list_of(integer()));
    s.insert("rect_min_x", float());
    s.insert("rect_min_y", float());
    s.insert("rect_max_x", float());
    s.insert("rect_max_y", float());
    s.insert("region", string());
    s.insert("request", one_of_strings(["pois", "list", "stats"]));
    s.insert("requests_kwargs", Rule::of(Kind::Dict));
    s.insert("resolve_locations", flag());
    s.insert("retry_counter", integer());
    s.insert("roundabout_exits", flag());
    s.insert("segments", integer());
    s.insert("size", integer());
    s.insert("smoothing", float().min(0.0).max(1.0));
    s.insert("sortby", one_of_strings(["distance", "category"]));
    s.insert(
        "sources",
        list_of(string()).allowed(["osm", "oa", "wof", "gn"]),
    );
    s.insert("text", string());
    s.insert("units", one_of_strings(["m", "km", "mi"]));
    s.insert("url", string());

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_built_once() {
        let a = ors_parameters() as *const ParameterSchema;
        let b = ors_parameters() as *const ParameterSchema;
        assert_eq!(a, b);
    }

    #[test]
    fn declares_key_parameters() {
        let schema = ors_parameters();
        for name in ["profile", "units", "options", "coordinates", "radiuses", "sources"] {
            assert!(schema.contains(name), "missing rule for {name}");
        }
        assert!(!schema.contains("api_key"));
        assert!(!schema.contains("first_request_time"));
    }

    #[test]
    fn parameter_count() {
        assert_eq!(ors_parameters().len(), 65);
    }

    #[test]
    fn names_are_sorted() {
        let names = ors_parameters().names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn flags_share_one_shape() {
        let schema = ors_parameters();
        assert_eq!(schema.get("elevation"), schema.get("geometry_simplify"));
        assert_eq!(schema.get("elevation").and_then(Rule::kinds), Some(&[Kind::String][..]));
    }

    #[test]
    fn schema_dumps_to_json() {
        let value = serde_json::to_value(ors_parameters()).unwrap();
        assert_eq!(value["units"][0]["type"][0], "string");
        assert_eq!(value["units"][1]["allowed"][1], "km");
    }

    #[test]
    fn custom_schema_insert_replaces() {
        let mut schema = ParameterSchema::new();
        assert!(schema.insert("limit", Rule::of(Kind::Integer)).is_none());
        assert!(schema.insert("limit", Rule::of(Kind::Float)).is_some());
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.iter().next().map(|(n, _)| n), Some("limit"));
    }
}
