use chrono::NaiveDate;
use liftbook_domain as domain;

use crate::{Calendar, Context, Effect, Navigation, Page};

pub const NO_WORKOUTS: &str = "No workouts found.";

// ------ ------
//     Init
// ------ ------

#[must_use]
pub fn init(today: NaiveDate) -> Model {
    Model {
        workouts: vec![],
        expanded: None,
        dialog: Dialog::Hidden,
        calendar: Calendar::new(today),
        loading: false,
        error: None,
    }
}

// ------ ------
//     Model
// ------ ------

pub struct Model {
    pub workouts: Vec<domain::WorkoutSummary>,
    pub expanded: Option<Expanded>,
    pub dialog: Dialog,
    pub calendar: Calendar,
    pub loading: bool,
    pub error: Option<String>,
}

/// Row showing its exercises.
#[derive(Debug, Clone, PartialEq)]
pub struct Expanded {
    pub id: domain::WorkoutID,
    pub workout: Option<domain::Workout>,
    /// Sets were edited but not saved yet.
    pub modified: bool,
}

impl Expanded {
    fn edit_set(
        &mut self,
        exercise_idx: usize,
        set_idx: usize,
        edit: impl FnOnce(&mut domain::ExerciseSet),
    ) {
        if let Some(set) = self
            .workout
            .as_mut()
            .and_then(|w| w.exercises.get_mut(exercise_idx))
            .and_then(|e| e.sets.get_mut(set_idx))
        {
            edit(set);
            self.modified = true;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    Hidden,
    DeleteWorkout(domain::WorkoutID),
}

impl Model {
    /// Message shown instead of an empty list.
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        (!self.loading && self.error.is_none() && self.workouts.is_empty()).then_some(NO_WORKOUTS)
    }

    fn update_calendar(&mut self) {
        self.calendar
            .set_workout_dates(self.workouts.iter().map(|w| w.date));
    }
}

// ------ ------
//    Update
// ------ ------

pub enum Msg {
    FetchWorkouts,
    WorkoutsFetched(Result<Vec<domain::WorkoutSummary>, domain::ReadError>),

    ToggleExpanded(domain::WorkoutID),
    WorkoutFetched(Result<domain::Workout, domain::ReadError>),
    ToggleSetCompleted(usize, usize),
    SetRepsChanged(usize, usize, String),
    SetWeightChanged(usize, usize, String),
    SaveSets,
    SetsSaved(Result<domain::Workout, domain::UpdateError>),

    LikeWorkout(domain::WorkoutID),
    WorkoutLiked(domain::WorkoutID, Result<u32, domain::UpdateError>),

    ShowDeleteDialog(domain::WorkoutID),
    CloseDialog,
    DeleteWorkout,
    WorkoutDeleted(Result<domain::WorkoutID, domain::DeleteError>),

    CreateWorkout,
    EditWorkout(domain::WorkoutID),
    ShowCategory(String),

    PreviousMonth,
    NextMonth,
    DismissError,
}

pub enum Cmd {
    FetchWorkouts,
    FetchWorkout(domain::WorkoutID),
    ReplaceWorkout(domain::Workout),
    LikeWorkout(domain::WorkoutID),
    DeleteWorkout(domain::WorkoutID),
}

impl Page for Model {
    type Msg = Msg;
    type Cmd = Cmd;

    fn update(&mut self, msg: Msg) -> Effect<Cmd> {
        match msg {
            Msg::FetchWorkouts => {
                self.loading = true;
                self.error = None;
                return Effect::Perform(Cmd::FetchWorkouts);
            }
            Msg::WorkoutsFetched(result) => {
                self.loading = false;
                match result {
                    Ok(workouts) => {
                        self.workouts = workouts;
                        self.update_calendar();
                    }
                    Err(err) => self.error = Some(format!("Failed to load workouts: {err}")),
                }
            }

            Msg::ToggleExpanded(id) => {
                if self.expanded.as_ref().is_some_and(|e| e.id == id) {
                    self.expanded = None;
                } else {
                    self.expanded = Some(Expanded {
                        id,
                        workout: None,
                        modified: false,
                    });
                    return Effect::Perform(Cmd::FetchWorkout(id));
                }
            }
            Msg::WorkoutFetched(result) => match result {
                Ok(workout) => {
                    if let Some(expanded) = self.expanded.as_mut().filter(|e| e.id == workout.id) {
                        expanded.workout = Some(workout);
                    }
                }
                Err(err) => {
                    self.expanded = None;
                    self.error = Some(format!("Failed to load workout: {err}"));
                }
            },
            Msg::ToggleSetCompleted(exercise_idx, set_idx) => {
                if let Some(expanded) = &mut self.expanded {
                    expanded.edit_set(exercise_idx, set_idx, |set| {
                        set.completed = !set.completed;
                    });
                }
            }
            Msg::SetRepsChanged(exercise_idx, set_idx, reps) => {
                if let Some(expanded) = &mut self.expanded {
                    expanded.edit_set(exercise_idx, set_idx, |set| {
                        set.reps = domain::Reps::parse_or_zero(&reps);
                    });
                }
            }
            Msg::SetWeightChanged(exercise_idx, set_idx, weight) => {
                if let Some(expanded) = &mut self.expanded {
                    expanded.edit_set(exercise_idx, set_idx, |set| {
                        set.weight = domain::Weight::parse_or_zero(&weight);
                    });
                }
            }
            Msg::SaveSets => {
                if let Some(workout) = self
                    .expanded
                    .as_ref()
                    .filter(|e| e.modified)
                    .and_then(|e| e.workout.clone())
                {
                    self.loading = true;
                    return Effect::Perform(Cmd::ReplaceWorkout(workout));
                }
            }
            Msg::SetsSaved(result) => {
                self.loading = false;
                match result {
                    Ok(workout) => {
                        if let Some(expanded) =
                            self.expanded.as_mut().filter(|e| e.id == workout.id)
                        {
                            expanded.workout = Some(workout);
                            expanded.modified = false;
                        }
                    }
                    Err(_) => {
                        self.error = Some("Failed to update sets. Please try again.".to_string());
                    }
                }
            }

            Msg::LikeWorkout(id) => return Effect::Perform(Cmd::LikeWorkout(id)),
            Msg::WorkoutLiked(id, result) => match result {
                Ok(likes) => {
                    if let Some(workout) = self.workouts.iter_mut().find(|w| w.id == id) {
                        workout.likes = likes;
                    }
                }
                Err(_) => {
                    self.error = Some("Failed to like workout. Please try again.".to_string());
                }
            },

            Msg::ShowDeleteDialog(id) => self.dialog = Dialog::DeleteWorkout(id),
            Msg::CloseDialog => self.dialog = Dialog::Hidden,
            Msg::DeleteWorkout => {
                if let Dialog::DeleteWorkout(id) = self.dialog {
                    self.dialog = Dialog::Hidden;
                    self.loading = true;
                    return Effect::Perform(Cmd::DeleteWorkout(id));
                }
            }
            Msg::WorkoutDeleted(result) => {
                self.loading = false;
                match result {
                    Ok(id) => {
                        self.workouts.retain(|w| w.id != id);
                        if self.expanded.as_ref().is_some_and(|e| e.id == id) {
                            self.expanded = None;
                        }
                        self.update_calendar();
                    }
                    Err(_) => {
                        self.error =
                            Some("Failed to delete workout. Please try again.".to_string());
                    }
                }
            }

            Msg::CreateWorkout => return Effect::Navigate(Navigation::CreateWorkout),
            Msg::EditWorkout(id) => return Effect::Navigate(Navigation::EditWorkout(id)),
            Msg::ShowCategory(category) => {
                return Effect::Navigate(Navigation::CategoryWorkouts(category));
            }

            Msg::PreviousMonth => self.calendar.previous_month(),
            Msg::NextMonth => self.calendar.next_month(),
            Msg::DismissError => self.error = None,
        }

        Effect::None
    }

    async fn perform<S, C>(cmd: Cmd, context: &Context<S, C>) -> Msg
    where
        S: domain::WorkoutService,
        C: domain::CatalogRepository,
    {
        match cmd {
            Cmd::FetchWorkouts => Msg::WorkoutsFetched(context.workouts.get_workouts().await),
            Cmd::FetchWorkout(id) => Msg::WorkoutFetched(context.workouts.get_workout(id).await),
            Cmd::ReplaceWorkout(workout) => {
                Msg::SetsSaved(context.workouts.replace_workout(workout).await)
            }
            Cmd::LikeWorkout(id) => Msg::WorkoutLiked(id, context.workouts.like_workout(id).await),
            Cmd::DeleteWorkout(id) => {
                Msg::WorkoutDeleted(context.workouts.delete_workout(id).await)
            }
        }
    }
}
