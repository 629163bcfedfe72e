//! Human-readable alert bodies

use crate::shared::types::Price;
use crate::shared::utils::format_price;
use super::AlertDecision;

const MARKER_UP: &str = "⬆️";
const MARKER_DOWN: &str = "⬇️";
const MARKER_FIRST: &str = "✔️";
const MARKER_TARGET: &str = "🎯";

/// Compose the message body for an alert. `None` for `AlertDecision::Skip`.
pub fn compose(decision: &AlertDecision, title: &str, price: Price, currency: &str) -> Option<String> {
    let headline = match decision {
        AlertDecision::Skip => return None,
        AlertDecision::FirstSeen => format!("{} {}", MARKER_FIRST, title),
        AlertDecision::Changed { delta, .. } => format!("{} {}", direction(*delta), title),
        AlertDecision::AtOrBelowThreshold { .. } => format!("{} {}", MARKER_TARGET, title),
    };

    let mut body = format!("{}\nPrecio: ${} {}", headline, format_price(price), currency);
    match decision {
        AlertDecision::Changed { previous, delta } => {
            let sign = if delta.is_sign_negative() { "-" } else { "+" };
            body.push_str(&format!(
                "\nAnterior: ${} {}\nCambio: {}{}",
                format_price(*previous),
                currency,
                sign,
                format_price(delta.abs())
            ));
        }
        AlertDecision::AtOrBelowThreshold { threshold } => {
            body.push_str(&format!("\nUmbral: ${} {}", format_price(*threshold), currency));
        }
        _ => {}
    }
    Some(body)
}

pub fn direction(delta: Price) -> &'static str {
    if delta.is_sign_positive() && !delta.is_zero() {
        MARKER_UP
    } else {
        MARKER_DOWN
    }
}
