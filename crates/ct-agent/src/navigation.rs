//! The `NavigationPolicy` trait: the pluggable direction chooser.

use ct_core::{AgentRng, Direction};

use crate::NavContext;

/// Picks one direction out of a vehicle's current candidates.
///
/// Policies are stateless; anything random must come from the vehicle's own
/// [`AgentRng`] so a run is reproducible from its seed regardless of the
/// roster order.
///
/// # Contract
///
/// Return a member of `ctx.candidates`, or `None` to give up for this tick.
/// A direction outside the candidate set is treated as giving up.
///
/// # Example
///
/// ```rust
/// use ct_agent::{NavContext, NavigationPolicy};
/// use ct_core::{AgentRng, Direction};
///
/// /// Always goes right if it can.
/// struct KeepRight;
///
/// impl NavigationPolicy for KeepRight {
///     fn choose(&self, ctx: &NavContext<'_>, _rng: &mut AgentRng) -> Option<Direction> {
///         ctx.candidates.contains(Direction::Right).then_some(Direction::Right)
///     }
/// }
/// ```
pub trait NavigationPolicy: Send + Sync + 'static {
    fn choose(&self, ctx: &NavContext<'_>, rng: &mut AgentRng) -> Option<Direction>;
}
