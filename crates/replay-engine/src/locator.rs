use crate::backend::{Backend, ElementHandle};
use crate::variables::VariableStore;
use crate::waiter::{WaitError, WaitOptions, wait_for_element};
use thiserror::Error;

/// An element found by [`locate`], with the candidates that failed before it.
#[derive(Debug)]
pub struct Located {
    pub element: ElementHandle,
    /// Substituted selector that matched.
    pub selector: String,
    /// Position of the matching candidate (0 is the primary selector).
    pub position: usize,
    pub failures: Vec<WaitError>,
}

#[derive(Debug, Error)]
#[error("No valid target found among selectors: [{}]", attempted.join(", "))]
pub struct NoValidTarget {
    pub attempted: Vec<String>,
    pub failures: Vec<WaitError>,
}

/// Try the primary selector, then each fallback in authored order.
///
/// Every candidate is substituted against `variables` right before it is
/// waited on. The first candidate that resolves wins; later ones are never
/// queried.
pub async fn locate<B: Backend + ?Sized>(
    backend: &mut B,
    primary: Option<&str>,
    fallbacks: &[String],
    variables: &VariableStore,
    options: &WaitOptions,
) -> Result<Located, NoValidTarget> {
    let candidates = std::iter::once(primary).chain(fallbacks.iter().map(|s| Some(s.as_str())));

    let mut attempted = Vec::new();
    let mut failures = Vec::new();

    for (position, raw) in candidates.enumerate() {
        let selector = variables.substitute(raw);
        attempted.push(selector.clone());

        match wait_for_element(backend, &selector, options).await {
            Ok(element) => {
                return Ok(Located {
                    element,
                    selector,
                    position,
                    failures,
                });
            }
            Err(e) => failures.push(e),
        }
    }

    Err(NoValidTarget {
        attempted,
        failures,
    })
}
