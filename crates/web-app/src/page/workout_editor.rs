use chrono::NaiveDate;
use liftbook_domain as domain;
use log::debug;

use crate::{Context, Effect, Navigation, Page};

pub const WORKOUT_NOT_LOADED: &str = "Workout could not be loaded. Please reload it before saving.";

// ------ ------
//     Init
// ------ ------

#[must_use]
pub fn init(mode: Mode, today: NaiveDate) -> Model {
    Model {
        mode,
        draft: domain::WorkoutDraft::new(today),
        search: Search::default(),
        loading: false,
        saving: false,
        error: None,
    }
}

// ------ ------
//     Model
// ------ ------

pub struct Model {
    pub mode: Mode,
    pub draft: domain::WorkoutDraft,
    pub search: Search,
    pub loading: bool,
    pub saving: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit(domain::WorkoutID),
}

#[derive(Debug, Default)]
pub struct Search {
    pub term: String,
    pub results: Vec<domain::Exercise>,
    pub warning: Option<String>,
    pub searching: bool,
}

// ------ ------
//    Update
// ------ ------

pub enum Msg {
    Initialize,
    StagedExerciseTaken(Option<domain::Exercise>),
    WorkoutFetched(Result<domain::Workout, domain::ReadError>),

    NameChanged(String),
    DateChanged(NaiveDate),

    SearchTermChanged(String),
    Search,
    SearchCompleted(domain::Listing<domain::Exercise>),

    AddExercise(usize),
    RemoveExercise(usize),
    AddSet(usize),
    RemoveSet(usize, usize),
    SetFieldChanged(usize, usize, domain::SetField),

    Save,
    SaveCompleted(
        Box<domain::WorkoutDraft>,
        Result<domain::Workout, domain::SaveError>,
    ),
    Cancel,
}

pub enum Cmd {
    TakeStagedExercise,
    FetchWorkout(domain::WorkoutID),
    Search(domain::CatalogQuery),
    Save(Box<domain::WorkoutDraft>),
}

impl Page for Model {
    type Msg = Msg;
    type Cmd = Cmd;

    fn update(&mut self, msg: Msg) -> Effect<Cmd> {
        match msg {
            Msg::Initialize => match self.mode {
                Mode::Create => return Effect::Perform(Cmd::TakeStagedExercise),
                Mode::Edit(id) => {
                    self.loading = true;
                    self.error = None;
                    return Effect::Perform(Cmd::FetchWorkout(id));
                }
            },
            Msg::StagedExerciseTaken(exercise) => {
                if let Some(exercise) = exercise {
                    debug!("adding staged exercise {}", exercise.id);
                    self.draft.add_exercise(&exercise);
                }
            }
            Msg::WorkoutFetched(result) => {
                self.loading = false;
                match result {
                    Ok(workout) => self.draft = domain::WorkoutDraft::from_workout(workout),
                    Err(domain::ReadError::NotFound) => {
                        self.error = Some("Workout not found".to_string());
                        return Effect::Navigate(Navigation::WorkoutList);
                    }
                    Err(err) => self.error = Some(format!("Failed to load workout: {err}")),
                }
            }

            Msg::NameChanged(name) => self.draft.set_name(&name),
            Msg::DateChanged(date) => self.draft.set_date(date),

            Msg::SearchTermChanged(term) => self.search.term = term,
            Msg::Search => {
                let term = self.search.term.trim();
                if !term.is_empty() {
                    self.search.searching = true;
                    return Effect::Perform(Cmd::Search(domain::CatalogQuery::Name(
                        term.to_string(),
                    )));
                }
            }
            Msg::SearchCompleted(listing) => {
                self.search.searching = false;
                self.search.results = listing.items;
                self.search.warning = listing.warning;
            }

            Msg::AddExercise(result_idx) => {
                if let Some(exercise) = self.search.results.get(result_idx) {
                    self.draft.add_exercise(exercise);
                    self.search.results.clear();
                    self.search.term.clear();
                }
            }
            Msg::RemoveExercise(exercise_idx) => self.draft.remove_exercise(exercise_idx),
            Msg::AddSet(exercise_idx) => self.draft.add_set(exercise_idx),
            Msg::RemoveSet(exercise_idx, set_idx) => self.draft.remove_set(exercise_idx, set_idx),
            Msg::SetFieldChanged(exercise_idx, set_idx, field) => {
                self.draft.update_set_field(exercise_idx, set_idx, field);
            }

            Msg::Save => {
                if matches!(self.mode, Mode::Edit(id) if self.draft.id() != Some(id)) {
                    self.error = Some(WORKOUT_NOT_LOADED.to_string());
                    return Effect::None;
                }
                if let Err(err) = self.draft.validate() {
                    self.error = Some(err.to_string());
                } else if self.draft.is_open() && !self.saving {
                    self.saving = true;
                    self.error = None;
                    return Effect::Perform(Cmd::Save(Box::new(self.draft.clone())));
                }
            }
            Msg::SaveCompleted(draft, result) => {
                self.saving = false;
                self.draft = *draft;
                match result {
                    Ok(_) => return Effect::Navigate(Navigation::WorkoutList),
                    Err(err) => self.error = Some(err.to_string()),
                }
            }
            Msg::Cancel => {
                self.draft.discard();
                return Effect::Navigate(Navigation::WorkoutList);
            }
        }

        Effect::None
    }

    async fn perform<S, C>(cmd: Cmd, context: &Context<S, C>) -> Msg
    where
        S: domain::WorkoutService,
        C: domain::CatalogRepository,
    {
        match cmd {
            Cmd::TakeStagedExercise => Msg::StagedExerciseTaken(context.handoff.take()),
            Cmd::FetchWorkout(id) => Msg::WorkoutFetched(context.workouts.get_workout(id).await),
            Cmd::Search(query) => Msg::SearchCompleted(context.catalog.exercises(&query).await),
            Cmd::Save(mut draft) => {
                let result = draft.save(&context.workouts).await;
                Msg::SaveCompleted(draft, result)
            }
        }
    }
}
