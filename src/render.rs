use serde::Serialize;

const GREEN_GRADIENT: &str = "linear-gradient(90deg,#2f855a,#38a169)";
const AMBER_GRADIENT: &str = "linear-gradient(90deg,#f6c23c,#f6a419)";
const RED_GRADIENT: &str = "linear-gradient(90deg,#e53e3e,#c53030)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Present,
    Absent,
}

impl Classification {
    pub fn css_class(self) -> &'static str {
        match self {
            Classification::Present => "present",
            Classification::Absent => "absent",
        }
    }
}

/// Case-insensitive substring match. A label phrased as a negation ("not
/// present") still classifies Present; the observed upstream labels make
/// this rule ambiguous and the choice is documented in DESIGN.md.
pub fn classify(label: &str) -> Classification {
    if label.to_lowercase().contains("present") {
        Classification::Present
    } else {
        Classification::Absent
    }
}

/// Rendered result regions handed back to the form page.
#[derive(Clone, Debug, Serialize)]
pub struct ResultView {
    pub label: String,
    pub confidence: f64,
    pub summary_html: String,
    pub badge_html: String,
    pub gauge: GaugeView,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct GaugeView {
    pub caption: String,
    pub gradient: &'static str,
    pub width: f64,
}

pub fn result_view(label: &str, confidence: f64) -> ResultView {
    let cls = classify(label);
    ResultView {
        label: label.to_string(),
        confidence,
        summary_html: summary_html(label, cls),
        badge_html: badge_html(label, cls),
        gauge: gauge_view(confidence),
    }
}

pub fn summary_html(label: &str, cls: Classification) -> String {
    format!(
        r#"<p><strong>Prediction:</strong> <span class="status {}">{}</span></p>"#,
        cls.css_class(),
        label
    )
}

/// Inline heart SVG with the label overlaid at the bottom. Rose-red tones
/// for Present, green tones for Absent.
pub fn badge_html(label: &str, cls: Classification) -> String {
    let (fill_color, glow_color) = match cls {
        Classification::Present => ("#ff5a6e", "rgba(255,90,110,0.18)"),
        Classification::Absent => ("#34d399", "rgba(52,211,153,0.12)"),
    };

    format!(
        r##"<svg viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg" aria-hidden="true" class="pulse">
  <defs>
    <linearGradient id="hb" x1="0" x2="1">
      <stop offset="0" stop-color="{fill_color}" stop-opacity="0.95" />
      <stop offset="1" stop-color="#ff2d55" stop-opacity="0.95" />
    </linearGradient>
  </defs>
  <path d="M12 21s-6-4.35-6-9a6 6 0 0112 0c0 4.65-6 9-6 9z" fill="url(#hb)" style="filter: drop-shadow(0 10px 22px {glow_color});" />
</svg>
<div class="badge-label">{label}</div>"##
    )
}

pub fn gauge_view(confidence: f64) -> GaugeView {
    GaugeView {
        caption: format!("{confidence:.4}% confidence"),
        gradient: tier_gradient(confidence),
        width: clamp_width(confidence),
    }
}

/// Three-tier gradient: 65 and above green, 40 up to 65 amber, below 40 red.
pub fn tier_gradient(confidence: f64) -> &'static str {
    if confidence >= 65.0 {
        GREEN_GRADIENT
    } else if confidence >= 40.0 {
        AMBER_GRADIENT
    } else {
        RED_GRADIENT
    }
}

/// Fill width in percent, bounded to [1, 100] so the bar is always visible
/// and never overflows its track.
pub fn clamp_width(confidence: f64) -> f64 {
    confidence.clamp(1.0, 100.0)
}
