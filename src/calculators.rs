//! Earnings calculators.
//!
//! Both calculators are pure. Inputs arrive as loosely-typed JSON and are
//! coerced into [`Number`]; values that cannot be read as numbers become NaN
//! and propagate through the arithmetic instead of failing the request.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Per-subscriber payout for each subscription tier.
const TIER_RATES: [(f64, f64); 3] = [(1.0, 2.5), (2.0, 5.0), (3.0, 12.5)];

/// Rate used when the tier is not in [`TIER_RATES`].
const FALLBACK_RATE: f64 = 2.5;

/// Earnings for `subs` subscribers at `tier`. Unknown tiers pay the tier-1 rate.
pub fn subscription_earnings(subs: f64, tier: f64) -> f64 {
    let rate = TIER_RATES
        .iter()
        .find(|(t, _)| *t == tier)
        .map(|(_, rate)| *rate)
        .unwrap_or(FALLBACK_RATE);
    subs * rate
}

/// Earnings for `ad_minutes` of ads shown to `viewers` at `cpm` per thousand.
pub fn ad_earnings(ad_minutes: f64, viewers: f64, cpm: f64) -> f64 {
    (viewers / 1000.0) * cpm * ad_minutes
}

/// A permissively-parsed JSON number.
///
/// Accepts numbers, numeric strings (blank is zero) and booleans. Anything
/// else becomes NaN. Serializes integral values as JSON integers and
/// non-finite values as `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number(pub f64);

impl Number {
    pub fn get(self) -> f64 {
        self.0
    }

    fn parse_str(s: &str) -> f64 {
        let s = s.trim();
        if s.is_empty() {
            return 0.0;
        }
        match s {
            "Infinity" | "+Infinity" => f64::INFINITY,
            "-Infinity" => f64::NEG_INFINITY,
            // Rust accepts "inf"/"nan" spellings that should stay non-numeric.
            _ if s.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) => f64::NAN,
            _ => s.parse().unwrap_or(f64::NAN),
        }
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Self(v)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        const MAX_SAFE_INT: f64 = 9_007_199_254_740_991.0;

        let v = self.0;
        if !v.is_finite() {
            serializer.serialize_none()
        } else if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INT {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumberVisitor;

        impl<'de> Visitor<'de> for NumberVisitor {
            type Value = Number;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a value coercible to a number")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Number, E> {
                Ok(Number(if v { 1.0 } else { 0.0 }))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Number, E> {
                Ok(Number(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Number, E> {
                Ok(Number(v as f64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Number, E> {
                Ok(Number(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Number, E> {
                Ok(Number(Number::parse_str(v)))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Number, E> {
                Ok(Number(0.0))
            }

            fn visit_none<E: de::Error>(self) -> Result<Number, E> {
                Ok(Number(0.0))
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Number, D::Error> {
                d.deserialize_any(self)
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Number, A::Error> {
                while seq.next_element::<de::IgnoredAny>()?.is_some() {}
                Ok(Number(f64::NAN))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Number, A::Error> {
                while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
                Ok(Number(f64::NAN))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

// ─── Request/Response Types ────────────────────────────────────────────────

/// Body of `POST /calc-subs`.
#[derive(Debug, Default, Deserialize)]
pub struct SubsInput {
    #[serde(default)]
    pub subs: Option<Number>,
    #[serde(default)]
    pub tier: Option<Number>,
}

/// Response of `POST /calc-subs`.
#[derive(Debug, Serialize)]
pub struct SubsResult {
    pub subs: Number,
    pub tier: Number,
    pub earnings: Number,
}

impl SubsInput {
    pub fn calculate(&self) -> SubsResult {
        let subs = self.subs.unwrap_or(Number(0.0));
        let tier = self.tier.unwrap_or(Number(1.0));
        SubsResult {
            subs,
            tier,
            earnings: subscription_earnings(subs.get(), tier.get()).into(),
        }
    }
}

/// Body of `POST /calc-ads`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdsInput {
    #[serde(default)]
    pub ad_minutes: Option<Number>,
    #[serde(default)]
    pub viewers: Option<Number>,
    #[serde(default)]
    pub cpm: Option<Number>,
}

/// Response of `POST /calc-ads`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdsResult {
    pub ad_minutes: Number,
    pub viewers: Number,
    pub cpm: Number,
    pub earnings: Number,
}

impl AdsInput {
    pub fn calculate(&self) -> AdsResult {
        let ad_minutes = self.ad_minutes.unwrap_or(Number(0.0));
        let viewers = self.viewers.unwrap_or(Number(0.0));
        let cpm = self.cpm.unwrap_or(Number(3.0));
        AdsResult {
            ad_minutes,
            viewers,
            cpm,
            earnings: ad_earnings(ad_minutes.get(), viewers.get(), cpm.get()).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscription_earnings() {
        assert_eq!(subscription_earnings(100.0, 1.0), 250.0);
        assert_eq!(subscription_earnings(100.0, 2.0), 500.0);
        assert_eq!(subscription_earnings(100.0, 3.0), 1250.0);
        // Unknown tiers fall back to the tier-1 rate.
        assert_eq!(subscription_earnings(100.0, 99.0), 250.0);
        assert_eq!(subscription_earnings(100.0, 2.5), 250.0);
        assert_eq!(subscription_earnings(100.0, f64::NAN), 250.0);
        assert_eq!(subscription_earnings(-4.0, 2.0), -20.0);
    }

    #[test]
    fn test_ad_earnings() {
        assert_eq!(ad_earnings(10.0, 5000.0, 3.0), 150.0);
        assert_eq!(ad_earnings(0.0, 5000.0, 3.0), 0.0);
        assert!(ad_earnings(f64::NAN, 5000.0, 3.0).is_nan());
    }

    #[test]
    fn test_number_coercion() {
        let parse = |v: serde_json::Value| serde_json::from_value::<Number>(v).unwrap().get();

        assert_eq!(parse(json!(12)), 12.0);
        assert_eq!(parse(json!(-1.5)), -1.5);
        assert_eq!(parse(json!("42")), 42.0);
        assert_eq!(parse(json!("  7.25 ")), 7.25);
        assert_eq!(parse(json!("1e3")), 1000.0);
        assert_eq!(parse(json!("")), 0.0);
        assert_eq!(parse(json!(true)), 1.0);
        assert_eq!(parse(json!(false)), 0.0);
        assert!(parse(json!("abc")).is_nan());
        assert!(parse(json!("inf")).is_nan());
        assert!(parse(json!([1, 2])).is_nan());
        assert!(parse(json!({"a": 1})).is_nan());
    }

    #[test]
    fn test_number_serialization() {
        assert_eq!(serde_json::to_string(&Number(500.0)).unwrap(), "500");
        assert_eq!(serde_json::to_string(&Number(-3.0)).unwrap(), "-3");
        assert_eq!(serde_json::to_string(&Number(12.5)).unwrap(), "12.5");
        assert_eq!(serde_json::to_string(&Number(f64::NAN)).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Number(f64::INFINITY)).unwrap(), "null");
    }

    #[test]
    fn test_subs_defaults() {
        let input: SubsInput = serde_json::from_value(json!({})).unwrap();
        let out = serde_json::to_value(input.calculate()).unwrap();
        assert_eq!(out, json!({"subs": 0, "tier": 1, "earnings": 0}));

        let input: SubsInput = serde_json::from_value(json!({"subs": "100", "tier": null})).unwrap();
        let out = serde_json::to_value(input.calculate()).unwrap();
        assert_eq!(out, json!({"subs": 100, "tier": 1, "earnings": 250}));
    }

    #[test]
    fn test_ads_defaults_and_nan() {
        let input: AdsInput =
            serde_json::from_value(json!({"adMinutes": 10, "viewers": 5000})).unwrap();
        let out = serde_json::to_value(input.calculate()).unwrap();
        assert_eq!(out, json!({"adMinutes": 10, "viewers": 5000, "cpm": 3, "earnings": 150}));

        let input: AdsInput =
            serde_json::from_value(json!({"adMinutes": "lots", "viewers": 5000, "cpm": 0})).unwrap();
        let out = serde_json::to_value(input.calculate()).unwrap();
        assert_eq!(
            out,
            json!({"adMinutes": null, "viewers": 5000, "cpm": 0, "earnings": null})
        );

        let input: AdsInput =
            serde_json::from_value(json!({"adMinutes": 10, "viewers": 5000, "cpm": null})).unwrap();
        assert_eq!(input.calculate().cpm, Number(3.0));
    }

    #[test]
    fn test_supplied_zero_is_kept() {
        let input: AdsInput =
            serde_json::from_value(json!({"adMinutes": 10, "viewers": 5000, "cpm": 0})).unwrap();
        let out = serde_json::to_value(input.calculate()).unwrap();
        assert_eq!(out, json!({"adMinutes": 10, "viewers": 5000, "cpm": 0, "earnings": 0}));

        let input: SubsInput = serde_json::from_value(json!({"subs": 100, "tier": 0})).unwrap();
        let out = serde_json::to_value(input.calculate()).unwrap();
        assert_eq!(out, json!({"subs": 100, "tier": 0, "earnings": 250}));
    }
}
