use serde::{Deserialize, Serialize};

use crate::assets::resolve_optional;
use crate::band::ConfidenceBand;
use crate::config::ClientConfig;
use crate::response::{AgeCheckSummary, AnalysisOutcome, AnalysisResponse, AutismPrediction};

pub const ADULT_NOTICE: &str =
    "Autism screening applies to children only. The subject was classified as an adult, so no screening was performed.";
pub const UNEXPECTED_NOTICE: &str =
    "The analysis service returned a response in an unexpected format.";

/// Everything the results panel needs, already resolved and banded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultView {
    ChildScreened(ChildScreenedView),
    AdultInvalid(AdultInvalidView),
    Unexpected { notice: String, detail: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildScreenedView {
    pub message: Option<String>,
    pub autism_image_url: Option<String>,
    pub regions: Vec<RegionRow>,
    pub verdict: Option<String>,
    pub age: Option<AgeSummaryView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdultInvalidView {
    pub message: Option<String>,
    pub notice: String,
    pub age: Option<AgeSummaryView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRow {
    pub region: String,
    pub label: String,
    pub confidence: f64,
    pub band: ConfidenceBand,
}

impl RegionRow {
    pub fn confidence_label(&self) -> String {
        format!("{:.1}%", self.confidence)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeSummaryView {
    pub image_url: Option<String>,
    pub kids_count: u32,
    pub adults_count: u32,
    pub faces_detected: bool,
    pub faces: Vec<FaceRow>,
}

impl AgeSummaryView {
    pub fn summary_line(&self) -> String {
        format!("Kids: {} | Adults: {}", self.kids_count, self.adults_count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRow {
    pub age: String,
    pub bbox: String,
}

impl ResultView {
    pub fn unexpected(detail: Option<String>) -> Self {
        ResultView::Unexpected {
            notice: UNEXPECTED_NOTICE.to_string(),
            detail,
        }
    }

    pub fn age(&self) -> Option<&AgeSummaryView> {
        match self {
            ResultView::ChildScreened(view) => view.age.as_ref(),
            ResultView::AdultInvalid(view) => view.age.as_ref(),
            ResultView::Unexpected { .. } => None,
        }
    }

    /// True when any autism output (image, table or verdict) would be shown.
    pub fn shows_autism_output(&self) -> bool {
        match self {
            ResultView::ChildScreened(view) => {
                view.autism_image_url.is_some() || !view.regions.is_empty() || view.verdict.is_some()
            }
            ResultView::AdultInvalid(_) | ResultView::Unexpected { .. } => false,
        }
    }
}

/// Builds the results panel for a response. Shape problems never escape:
/// they turn into the generic notice.
pub fn render(response: &AnalysisResponse, config: &ClientConfig) -> ResultView {
    match response.decode() {
        Ok(outcome) => render_outcome(outcome, config),
        Err(e) => {
            log::warn!("Could not render analysis response: {}", e);
            ResultView::unexpected(Some(e.to_string()))
        }
    }
}

pub fn render_outcome(outcome: AnalysisOutcome, config: &ClientConfig) -> ResultView {
    let base = config.api_base.as_str();

    match outcome {
        AnalysisOutcome::ChildScreened { message, age, screening } => {
            let (autism_image_url, regions, verdict) = match screening {
                Some(screening) => screening_parts(&screening, base),
                None => (None, Vec::new(), None),
            };
            ResultView::ChildScreened(ChildScreenedView {
                message,
                autism_image_url,
                regions,
                verdict,
                age: age.map(|summary| age_view(summary, None, base)),
            })
        }
        AnalysisOutcome::AdultInvalid { message, age, fallback_image_url } => {
            let age = match age {
                Some(summary) => Some(age_view(summary, fallback_image_url, base)),
                None => fallback_image_url.map(|url| AgeSummaryView {
                    image_url: resolve_optional(base, Some(&url)),
                    kids_count: 0,
                    adults_count: 0,
                    faces_detected: false,
                    faces: Vec::new(),
                }),
            };
            ResultView::AdultInvalid(AdultInvalidView {
                message,
                notice: ADULT_NOTICE.to_string(),
                age,
            })
        }
        AnalysisOutcome::Unrecognized { status, message } => {
            log::warn!("Unrecognized analysis status \"{}\"", status);
            ResultView::unexpected(message)
        }
    }
}

fn screening_parts(
    screening: &AutismPrediction,
    base: &str,
) -> (Option<String>, Vec<RegionRow>, Option<String>) {
    let image = resolve_optional(base, screening.annotated_image_path.as_deref());
    let regions = screening
        .regions()
        .map(|(region, label, confidence)| RegionRow {
            region: region.to_string(),
            label: label.to_string(),
            confidence,
            band: ConfidenceBand::of(confidence),
        })
        .collect();
    let verdict = screening.final_decision().map(str::to_string);
    (image, regions, verdict)
}

fn age_view(summary: AgeCheckSummary, fallback_image: Option<String>, base: &str) -> AgeSummaryView {
    let faces_detected = summary.faces_detected();
    let image_path = summary.annotated_image_url.or(fallback_image);

    AgeSummaryView {
        image_url: resolve_optional(base, image_path.as_deref()),
        kids_count: summary.kids_count,
        adults_count: summary.adults_count,
        faces_detected,
        faces: summary
            .annotations
            .iter()
            .map(|a| FaceRow {
                age: a.age.to_string(),
                bbox: format!(
                    "[{}]",
                    a.bbox.iter().map(|v| format!("{}", v)).collect::<Vec<_>>().join(", ")
                ),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ClientConfig {
        ClientConfig::default().with_api_base("https://svc.test")
    }

    fn render_json(value: serde_json::Value) -> ResultView {
        render(&AnalysisResponse::from_value(value).unwrap(), &config())
    }

    #[test]
    fn child_branch_resolves_and_bands() {
        let view = render_json(json!({
            "status": "child_autism_screened",
            "autism_prediction_data": {
                "annotated_image_path": "/static/autism/1.png",
                "results": [
                    {"region": "eyes", "label": "typical", "confidence": 82},
                    {"region": "nose", "label": "typical", "confidence": 55.5},
                    {"region": "mouth", "label": "atypical", "confidence": 12},
                    {"final_decision": "Non-Autistic"}
                ]
            },
            "age_check_summary": {
                "annotated_image_url": "https://cdn.test/age.png",
                "kids_count": 1, "adults_count": 0,
                "annotations": [{"age": 7, "box": [0, 0, 10, 10]}]
            }
        }));

        let ResultView::ChildScreened(child) = &view else {
            panic!("expected child view, got {:?}", view);
        };
        assert_eq!(child.autism_image_url.as_deref(), Some("https://svc.test/static/autism/1.png"));
        let bands: Vec<_> = child.regions.iter().map(|r| r.band).collect();
        assert_eq!(bands, vec![ConfidenceBand::High, ConfidenceBand::Medium, ConfidenceBand::Low]);
        assert_eq!(child.regions[1].confidence_label(), "55.5%");
        assert_eq!(child.verdict.as_deref(), Some("Non-Autistic"));

        let age = child.age.as_ref().unwrap();
        assert_eq!(age.image_url.as_deref(), Some("https://cdn.test/age.png"));
        assert_eq!(age.summary_line(), "Kids: 1 | Adults: 0");
        assert_eq!(age.faces, vec![FaceRow { age: "7".into(), bbox: "[0, 0, 10, 10]".into() }]);
        assert!(view.shows_autism_output());
    }

    #[test]
    fn adult_branch_never_shows_autism_output() {
        let view = render_json(json!({
            "status": "adult_invalid",
            "message": "Adult detected",
            "autism_prediction_data": {
                "annotated_image_path": "/static/autism/leak.png",
                "results": [{"region": "eyes", "label": "x", "confidence": 99}, {"final_decision": "Autistic"}]
            },
            "age_check_summary": {"annotated_image_url": "/static/age/2.png", "adults_count": 2, "kids_count": 0}
        }));

        assert!(!view.shows_autism_output());
        let ResultView::AdultInvalid(adult) = &view else {
            panic!("expected adult view");
        };
        assert_eq!(adult.notice, ADULT_NOTICE);
        assert_eq!(adult.message.as_deref(), Some("Adult detected"));
        let age = adult.age.as_ref().unwrap();
        assert_eq!(age.image_url.as_deref(), Some("https://svc.test/static/age/2.png"));
        assert_eq!(age.summary_line(), "Kids: 0 | Adults: 2");

        let serialized = serde_json::to_string(&view).unwrap();
        assert!(!serialized.contains("leak.png"));
        assert!(!serialized.contains("Autistic"));
    }

    #[test]
    fn adult_branch_uses_top_level_image_as_fallback() {
        let view = render_json(json!({
            "status": "adult_invalid",
            "annotated_image_url": "/static/age/legacy.png",
            "age_check_summary": {"adults_count": 1}
        }));
        assert_eq!(
            view.age().and_then(|a| a.image_url.clone()).as_deref(),
            Some("https://svc.test/static/age/legacy.png")
        );

        let no_summary = render_json(json!({
            "status": "adult_invalid",
            "annotated_image_url": "http://elsewhere.test/x.png"
        }));
        assert_eq!(
            no_summary.age().and_then(|a| a.image_url.clone()).as_deref(),
            Some("http://elsewhere.test/x.png")
        );
    }

    #[test]
    fn unknown_status_and_bad_shape_become_notice() {
        for value in [
            json!({"status": "processing"}),
            json!({"message": "no status at all"}),
            json!({"status": "child_autism_screened", "autism_prediction_data": {"results": "nope"}}),
            json!({"status": "child_autism_screened", "age_check_summary": [1, 2, 3]}),
        ] {
            let view = render_json(value);
            assert!(matches!(view, ResultView::Unexpected { ref notice, .. } if notice == UNEXPECTED_NOTICE));
        }
    }

    #[test]
    fn malformed_screening_entries_become_notice() {
        for results in [
            json!([{"region": "eyes", "label": "typical", "confidence": "high"}]),
            json!([{"region": "mouth", "label": "typical"}]),
            json!([{"final_decision": 5}]),
            json!([
                {"region": "eyes", "label": "typical", "confidence": 80},
                {"region": "nose", "label": "typical", "confidence": null}
            ]),
        ] {
            let view = render_json(json!({
                "status": "child_autism_screened",
                "autism_prediction_data": {"results": results}
            }));
            assert!(
                matches!(view, ResultView::Unexpected { ref notice, .. } if notice == UNEXPECTED_NOTICE),
                "got {:?}",
                view
            );
        }
    }

    #[test]
    fn child_without_screening_data_has_empty_table() {
        let view = render_json(json!({
            "status": "child_autism_screened",
            "age_check_summary": {"kids_count": 0, "adults_count": 0, "has_faces": false}
        }));
        let ResultView::ChildScreened(child) = view else {
            panic!("expected child view");
        };
        assert!(child.regions.is_empty());
        assert_eq!(child.verdict, None);
        assert!(!child.age.unwrap().faces_detected);
    }
}
