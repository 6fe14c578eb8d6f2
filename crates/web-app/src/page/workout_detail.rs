use liftbook_domain as domain;

use crate::{Context, Effect, Navigation, Page};

// ------ ------
//     Init
// ------ ------

#[must_use]
pub fn init(id: domain::WorkoutID) -> Model {
    Model {
        id,
        workout: None,
        loading: false,
        error: None,
    }
}

// ------ ------
//     Model
// ------ ------

pub struct Model {
    pub id: domain::WorkoutID,
    pub workout: Option<domain::Workout>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub exercises: usize,
    pub total_sets: usize,
    pub completed_sets: usize,
    pub volume: f32,
}

impl Model {
    #[must_use]
    pub fn summary(&self) -> Option<Summary> {
        self.workout.as_ref().map(|workout| Summary {
            exercises: workout.exercises.len(),
            total_sets: workout.total_sets(),
            completed_sets: workout.completed_sets(),
            volume: workout.volume(),
        })
    }
}

// ------ ------
//    Update
// ------ ------

pub enum Msg {
    FetchWorkout,
    WorkoutFetched(Result<domain::Workout, domain::ReadError>),
    LikeWorkout,
    WorkoutLiked(Result<u32, domain::UpdateError>),
    EditWorkout,
    Back,
}

pub enum Cmd {
    FetchWorkout(domain::WorkoutID),
    LikeWorkout(domain::WorkoutID),
}

impl Page for Model {
    type Msg = Msg;
    type Cmd = Cmd;

    fn update(&mut self, msg: Msg) -> Effect<Cmd> {
        match msg {
            Msg::FetchWorkout => {
                self.loading = true;
                self.error = None;
                return Effect::Perform(Cmd::FetchWorkout(self.id));
            }
            Msg::WorkoutFetched(result) => {
                self.loading = false;
                match result {
                    Ok(workout) => self.workout = Some(workout),
                    Err(domain::ReadError::NotFound) => {
                        self.workout = None;
                        self.error = Some("Workout not found".to_string());
                    }
                    Err(err) => {
                        self.error = Some(format!("Failed to load workout details: {err}"));
                    }
                }
            }
            Msg::LikeWorkout => return Effect::Perform(Cmd::LikeWorkout(self.id)),
            Msg::WorkoutLiked(result) => match result {
                Ok(likes) => {
                    if let Some(workout) = &mut self.workout {
                        workout.likes = likes;
                    }
                }
                Err(_) => {
                    self.error = Some("Failed to like workout. Please try again.".to_string());
                }
            },
            Msg::EditWorkout => return Effect::Navigate(Navigation::EditWorkout(self.id)),
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
            Cmd::FetchWorkout(id) => Msg::WorkoutFetched(context.workouts.get_workout(id).await),
            Cmd::LikeWorkout(id) => Msg::WorkoutLiked(context.workouts.like_workout(id).await),
        }
    }
}
