use liftbook_domain as domain;

use crate::{Context, Effect, Navigation, Page};

// ------ ------
//     Init
// ------ ------

#[must_use]
pub fn init(category: String) -> Model {
    Model {
        category,
        workouts: vec![],
        loading: false,
        error: None,
    }
}

// ------ ------
//     Model
// ------ ------

/// Workouts containing at least one exercise of a body part.
pub struct Model {
    pub category: String,
    pub workouts: Vec<domain::WorkoutSummary>,
    pub loading: bool,
    pub error: Option<String>,
}

// ------ ------
//    Update
// ------ ------

pub enum Msg {
    FetchWorkouts,
    WorkoutsFetched(Result<Vec<domain::WorkoutSummary>, domain::ReadError>),
    ShowWorkout(domain::WorkoutID),
    Back,
}

pub enum Cmd {
    FetchWorkouts(String),
}

impl Page for Model {
    type Msg = Msg;
    type Cmd = Cmd;

    fn update(&mut self, msg: Msg) -> Effect<Cmd> {
        match msg {
            Msg::FetchWorkouts => {
                self.loading = true;
                self.error = None;
                return Effect::Perform(Cmd::FetchWorkouts(self.category.clone()));
            }
            Msg::WorkoutsFetched(result) => {
                self.loading = false;
                match result {
                    Ok(workouts) => self.workouts = workouts,
                    Err(err) => {
                        self.error =
                            Some(format!("Failed to load workouts for this category: {err}"));
                    }
                }
            }
            Msg::ShowWorkout(id) => return Effect::Navigate(Navigation::WorkoutDetail(id)),
            Msg::Back => return Effect::Navigate(Navigation::WorkoutList),
        }

        Effect::None
    }

    async fn perform<S, C>(cmd: Cmd, context: &Context<S, C>) -> Msg
    where
        S: domain::WorkoutService,
        C: domain::CatalogRepository,
    {
        match cmd {
            Cmd::FetchWorkouts(category) => Msg::WorkoutsFetched(
                context.workouts.get_workouts_by_category(&category).await,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dispatch;
    use crate::tests::fakes::{context, workout};

    #[tokio::test]
    async fn test_fetch_workouts() {
        let mut chest_day = workout(2, "Chest Day", 5);
        chest_day.exercises[0].body_part = "chest".to_string();
        let context = context(vec![workout(1, "Leg Day", 3), chest_day]);
        let mut model = init("upper legs".to_string());

        dispatch(&mut model, Msg::FetchWorkouts, &context).await;

        assert!(!model.loading);
        assert_eq!(
            model.workouts.iter().map(|w| *w.id).collect::<Vec<_>>(),
            vec![1]
        );
        assert_eq!(
            dispatch(&mut model, Msg::ShowWorkout(1.into()), &context).await,
            Some(Navigation::WorkoutDetail(1.into()))
        );
    }

    #[tokio::test]
    async fn test_fetch_workouts_failure() {
        let context = context(vec![]);
        context.workouts.connected.set(false);
        let mut model = init("chest".to_string());

        dispatch(&mut model, Msg::FetchWorkouts, &context).await;

        assert!(!model.loading);
        assert_eq!(
            model.error,
            Some("Failed to load workouts for this category: no connection".to_string())
        );
    }
}
