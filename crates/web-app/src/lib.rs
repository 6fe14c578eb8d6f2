#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use liftbook_domain as domain;

pub mod calendar;
pub mod context;
pub mod page;

pub use calendar::Calendar;
pub use context::Context;

/// Targets of page transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    WorkoutList,
    CreateWorkout,
    EditWorkout(domain::WorkoutID),
    WorkoutDetail(domain::WorkoutID),
    CategoryWorkouts(String),
    ExerciseLibrary,
}

/// Outcome of a state transition.
#[derive(Debug, PartialEq)]
pub enum Effect<C> {
    None,
    /// Run the command and feed the resulting message back into the page.
    Perform(C),
    Navigate(Navigation),
}

/// Page model driven by messages.
///
/// `update` only changes the model. All I/O happens in `perform`, whose result is passed to
/// `update` again. A page observed between these two steps is in its loading state.
#[allow(async_fn_in_trait)]
pub trait Page {
    type Msg;
    type Cmd;

    fn update(&mut self, msg: Self::Msg) -> Effect<Self::Cmd>;

    async fn perform<S, C>(cmd: Self::Cmd, context: &Context<S, C>) -> Self::Msg
    where
        S: domain::WorkoutService,
        C: domain::CatalogRepository;
}

/// Processes a message and all commands following from it.
pub async fn dispatch<P, S, C>(
    page: &mut P,
    msg: P::Msg,
    context: &Context<S, C>,
) -> Option<Navigation>
where
    P: Page,
    S: domain::WorkoutService,
    C: domain::CatalogRepository,
{
    let mut msg = msg;
    loop {
        match page.update(msg) {
            Effect::None => return None,
            Effect::Navigate(navigation) => return Some(navigation),
            Effect::Perform(cmd) => msg = P::perform(cmd, context).await,
        }
    }
}
