//! Result normaliser: combined service payload → [`AnalysisResult`].
//!
//! Pure mapping. Apart from the timestamp (which [`normalize_at`] takes as an
//! argument) the output depends only on the payload and the request.
//!
//! ## Confidence score
//!
//! ```text
//! confidence = clamp01((emotion.score + corroboration + extremity / 100) / 3)
//!
//! corroboration = min(matched_sources / 5, 1)   if corroboration was requested
//!               = 0.5                           otherwise
//! ```
//!
//! When corroboration was not requested the service may still return matched
//! sources. They are dropped from the result and the corroboration term is
//! the neutral midpoint, so an unchecked claim scores like a "don't know".
//!
//! The authenticity `level` is the service's own label, never re-derived from
//! the source count.

use crate::output::{
    AnalysisResult, AuthenticationLevel, EmotionLevel, Lean, PoliticalToneLevel, Rewrites,
};
use crate::request::AnalysisRequest;
use crate::wire::{ClickbaitKind, FullAnalysisResponse};
use chrono::{DateTime, Utc};

/// Sources needed for the corroboration term to saturate at 1.
pub const SATURATING_SOURCES: f64 = 5.0;

/// Corroboration term used when no check was requested.
pub const NEUTRAL_CORROBORATION: f64 = 0.5;

/// Normalise with the current time as the result timestamp.
pub fn normalize(payload: &FullAnalysisResponse, request: &AnalysisRequest) -> AnalysisResult {
    normalize_at(payload, request, Utc::now())
}

/// Normalise with an explicit timestamp.
pub fn normalize_at(
    payload: &FullAnalysisResponse,
    request: &AnalysisRequest,
    timestamp: DateTime<Utc>,
) -> AnalysisResult {
    let want = request.want_corroboration();
    let emotion = &payload.emotion;
    let authenticity = &payload.authenticity;
    let political = &payload.political;

    let matched = authenticity.matched_sources.len();
    let authentication_level = AuthenticationLevel {
        score: if want { matched } else { 0 },
        level: authenticity.authenticity_level,
        sources: if want {
            authenticity.matched_sources.clone()
        } else {
            Vec::new()
        },
    };

    let headlines = &political.rewritten_headlines;
    let rewrites = Rewrites {
        left: rewrite_or_fallback(headlines.left.as_deref(), Lean::Left),
        center: rewrite_or_fallback(headlines.center.as_deref(), Lean::Center),
        right: rewrite_or_fallback(headlines.right.as_deref(), Lean::Right),
    };

    AnalysisResult {
        authentication_level,
        emotion_level: EmotionLevel {
            primary: emotion.emotion,
            confidence: emotion.score,
            is_clickbait: emotion.clickbait,
            is_ragebait: emotion.clickbait_type == Some(ClickbaitKind::Ragebait),
            clickbait_kind: emotion.clickbait_type,
        },
        confidence_score: confidence_score(
            emotion.score,
            matched,
            want,
            political.extremity_score,
        ),
        political_tone: PoliticalToneLevel {
            position: political.detected_tone,
            confidence: political.extremity_score / 100.0,
            extremity_score: political.extremity_score,
        },
        rewrites,
        original_text: request.original_text(),
        input_kind: request.kind(),
        timestamp,
        topic: payload.topic.clone(),
        keywords: payload.keywords.iter().cloned().collect(),
    }
}

/// The overall confidence score. Always within `[0, 1]`.
pub fn confidence_score(
    emotion_score: f64,
    matched_sources: usize,
    want_corroboration: bool,
    extremity_score: f64,
) -> f64 {
    let corroboration = if want_corroboration {
        (matched_sources as f64 / SATURATING_SOURCES).min(1.0)
    } else {
        NEUTRAL_CORROBORATION
    };
    clamp01((emotion_score + corroboration + extremity_score / 100.0) / 3.0)
}

fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

fn rewrite_or_fallback(rewrite: Option<&str>, lean: Lean) -> String {
    match rewrite {
        Some(r) if !r.trim().is_empty() => r.to_string(),
        _ => lean.fallback_rewrite().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{ImageUpload, InputKind, IMAGE_PLACEHOLDER};
    use crate::wire::{
        AuthenticityLevel, AuthenticityResponse, Emotion, EmotionResponse, PoliticalResponse,
        PoliticalTone, RewrittenHeadlines,
    };

    fn payload(sources: &[&str], emotion_score: f64, extremity: f64) -> FullAnalysisResponse {
        FullAnalysisResponse {
            emotion: EmotionResponse {
                emotion: Emotion::Joy,
                score: emotion_score,
                clickbait: false,
                clickbait_type: None,
            },
            authenticity: AuthenticityResponse {
                matched_sources: sources.iter().map(|s| s.to_string()).collect(),
                authenticity_level: AuthenticityLevel::Moderate,
            },
            political: PoliticalResponse {
                detected_tone: PoliticalTone::Center,
                extremity_score: extremity,
                rewritten_headlines: RewrittenHeadlines {
                    left: Some("L".into()),
                    center: Some("C".into()),
                    right: Some("R".into()),
                },
            },
            topic: "economy".into(),
            keywords: vec!["market".into(), "stocks".into(), "market".into()],
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn market_rises_with_two_sources() {
        let request = AnalysisRequest::text("Market rises");
        let r = normalize(&payload(&["Reuters", "AP"], 0.6, 30.0), &request);

        assert_eq!(r.authentication_level.score, 2);
        assert_eq!(r.authentication_level.level, AuthenticityLevel::Moderate);
        assert_eq!(r.authentication_level.sources, vec!["Reuters", "AP"]);
        assert!(approx(r.confidence_score, (0.6 + 0.4 + 0.3) / 3.0));
        assert!(approx(r.political_tone.confidence, 0.3));
        assert_eq!(r.original_text, "Market rises");
        assert_eq!(r.input_kind, InputKind::Text);
        assert_eq!(r.topic, "economy");
        assert_eq!(r.keywords.len(), 2);
    }

    #[test]
    fn corroboration_off_zeroes_sources_and_uses_midpoint() {
        let request = AnalysisRequest::text("Market rises").with_corroboration(false);
        let r = normalize(&payload(&["A", "B", "C"], 0.6, 30.0), &request);

        assert!(r.authentication_level.sources.is_empty());
        assert_eq!(r.authentication_level.score, 0);
        assert!(approx(r.confidence_score, (0.6 + 0.5 + 0.3) / 3.0));
    }

    #[test]
    fn level_is_not_recomputed_from_count() {
        // Six sources would be "high" by any count threshold; the service said low.
        let mut p = payload(&["a", "b", "c", "d", "e", "f"], 0.5, 10.0);
        p.authenticity.authenticity_level = AuthenticityLevel::Low;
        let r = normalize(&p, &AnalysisRequest::text("h"));
        assert_eq!(r.authentication_level.level, AuthenticityLevel::Low);
        assert_eq!(r.authentication_level.score, 6);
    }

    #[test]
    fn corroboration_term_saturates() {
        assert!(approx(confidence_score(0.0, 5, true, 0.0), 1.0 / 3.0));
        assert!(approx(confidence_score(0.0, 50, true, 0.0), 1.0 / 3.0));
        assert!(approx(confidence_score(0.0, 0, true, 0.0), 0.0));
    }

    #[test]
    fn confidence_stays_in_unit_interval() {
        for &e in &[0.0, 0.25, 0.5, 1.0] {
            for &n in &[0usize, 1, 4, 5, 100] {
                for &x in &[0.0, 33.3, 100.0] {
                    for &want in &[true, false] {
                        let c = confidence_score(e, n, want, x);
                        assert!((0.0..=1.0).contains(&c), "e={e} n={n} x={x} -> {c}");
                    }
                }
            }
        }
        // Out-of-range inputs from a misbehaving service are clamped too.
        assert_eq!(confidence_score(5.0, 10, true, 900.0), 1.0);
        assert_eq!(confidence_score(-5.0, 0, true, -900.0), 0.0);
        assert_eq!(confidence_score(f64::NAN, 0, true, 0.0), 0.0);
    }

    #[test]
    fn missing_rewrites_fall_back() {
        let mut p = payload(&[], 0.5, 50.0);
        p.political.rewritten_headlines = RewrittenHeadlines {
            left: None,
            center: Some(String::new()),
            right: Some("Right take".into()),
        };
        let r = normalize(&p, &AnalysisRequest::text("h"));
        assert_eq!(r.rewrites.left, Lean::Left.fallback_rewrite());
        assert_eq!(r.rewrites.center, Lean::Center.fallback_rewrite());
        assert_eq!(r.rewrites.right, "Right take");
    }

    #[test]
    fn ragebait_flag_follows_kind() {
        let mut p = payload(&[], 0.9, 50.0);
        p.emotion.clickbait = true;
        p.emotion.clickbait_type = Some(ClickbaitKind::Ragebait);
        let r = normalize(&p, &AnalysisRequest::text("h"));
        assert!(r.emotion_level.is_clickbait);
        assert!(r.emotion_level.is_ragebait);

        p.emotion.clickbait_type = Some(ClickbaitKind::Clickbait);
        let r = normalize(&p, &AnalysisRequest::text("h"));
        assert!(!r.emotion_level.is_ragebait);
    }

    #[test]
    fn image_input_uses_placeholder() {
        let request = AnalysisRequest::image(ImageUpload::new("shot.png", vec![1, 2, 3]));
        let r = normalize(&payload(&[], 0.5, 0.0), &request);
        assert_eq!(r.original_text, IMAGE_PLACEHOLDER);
        assert_eq!(r.input_kind, InputKind::Image);
    }

    #[test]
    fn idempotent_apart_from_timestamp() {
        let p = payload(&["Reuters"], 0.7, 40.0);
        let request = AnalysisRequest::url("http://news.example/a");
        let at = Utc::now();

        let a = normalize_at(&p, &request, at);
        let b = normalize_at(&p, &request, at);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );

        let c = normalize(&p, &request);
        assert!(a.same_assessment(&c));
    }

    #[test]
    fn result_serialises_camel_case() {
        let r = normalize(&payload(&["AP"], 0.5, 20.0), &AnalysisRequest::text("h"));
        let v = serde_json::to_value(&r).unwrap();
        assert!(v.get("authenticationLevel").is_some());
        assert!(v.get("confidenceScore").is_some());
        assert_eq!(v["emotionLevel"]["isRagebait"], serde_json::json!(false));
        assert_eq!(v["politicalTone"]["position"], serde_json::json!("center"));
        assert_eq!(v["inputKind"], serde_json::json!("text"));
    }
}
