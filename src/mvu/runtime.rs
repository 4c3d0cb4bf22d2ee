use crate::error::AppError;
use crate::mvu::round_form::{Msg, RoundFormModel, update};
use crate::mvu::round_form_effects::{Deps, run_effect};

/// Runs the MVU loop for the round form: applies `msg` and drains the effects it causes.
///
/// # Errors
///
/// Returns the `AppError` carried by the first failed effect; the model records it too.
pub async fn run_round_form(
    model: &mut RoundFormModel,
    msg: Msg,
    deps: Deps<'_>,
) -> Result<(), AppError> {
    let mut effects = update(model, msg);
    while let Some(effect) = effects.pop() {
        match run_effect(effect, deps).await {
            Msg::Failed(e) => {
                // Record failure and stop the loop.
                update(model, Msg::Failed(e.clone()));
                return Err(e);
            }
            other => {
                let next = update(model, other);
                effects.extend(next);
            }
        }
    }
    Ok(())
}

/// Feeds each message through [`run_round_form`] in order, stopping at the first failure.
///
/// # Errors
///
/// See [`run_round_form`].
pub async fn run_round_form_all(
    model: &mut RoundFormModel,
    msgs: Vec<Msg>,
    deps: Deps<'_>,
) -> Result<(), AppError> {
    for msg in msgs {
        run_round_form(model, msg, deps).await?;
    }
    Ok(())
}
