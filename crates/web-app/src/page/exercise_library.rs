//! Browsing the exercise catalog
//!
//! Searching by name and each of the three filters are mutually exclusive. Selecting one resets
//! the others.

use liftbook_domain as domain;

use crate::{Context, Effect, Navigation, Page};

// ------ ------
//     Init
// ------ ------

#[must_use]
pub fn init() -> Model {
    Model {
        exercises: vec![],
        body_parts: vec![],
        equipments: vec![],
        targets: vec![],
        search_term: String::new(),
        filter: None,
        details: None,
        loading: false,
        warning: None,
    }
}

// ------ ------
//     Model
// ------ ------

pub struct Model {
    pub exercises: Vec<domain::Exercise>,
    pub body_parts: Vec<String>,
    pub equipments: Vec<String>,
    pub targets: Vec<String>,
    pub search_term: String,
    pub filter: Option<(domain::CatalogFilter, String)>,
    /// Index of the exercise whose instructions are shown.
    pub details: Option<usize>,
    pub loading: bool,
    pub warning: Option<String>,
}

impl Model {
    #[must_use]
    pub fn selected(&self, filter: domain::CatalogFilter) -> &str {
        match &self.filter {
            Some((f, value)) if *f == filter => value.as_str(),
            _ => "",
        }
    }

    fn query(&self) -> domain::CatalogQuery {
        let search_term = self.search_term.trim();
        match &self.filter {
            Some((domain::CatalogFilter::BodyPart, value)) => {
                domain::CatalogQuery::BodyPart(value.clone())
            }
            Some((domain::CatalogFilter::Equipment, value)) => {
                domain::CatalogQuery::Equipment(value.clone())
            }
            Some((domain::CatalogFilter::Target, value)) => {
                domain::CatalogQuery::Target(value.clone())
            }
            None if !search_term.is_empty() => domain::CatalogQuery::Name(search_term.to_string()),
            None => domain::CatalogQuery::All,
        }
    }
}

// ------ ------
//    Update
// ------ ------

pub enum Msg {
    Initialize,
    Initialized(Box<Catalog>),

    SearchTermChanged(String),
    Search,
    FilterSelected(domain::CatalogFilter, String),
    ClearFilters,
    ExercisesFetched(domain::Listing<domain::Exercise>),

    ShowDetails(usize),
    CloseDetails,

    AddToWorkout(usize),
    ExerciseStaged,
}

/// Initial content of the library.
pub struct Catalog {
    pub exercises: domain::Listing<domain::Exercise>,
    pub body_parts: domain::Listing<String>,
    pub equipments: domain::Listing<String>,
    pub targets: domain::Listing<String>,
}

pub enum Cmd {
    Initialize,
    FetchExercises(domain::CatalogQuery),
    Stage(Box<domain::Exercise>),
}

impl Page for Model {
    type Msg = Msg;
    type Cmd = Cmd;

    fn update(&mut self, msg: Msg) -> Effect<Cmd> {
        match msg {
            Msg::Initialize => {
                self.loading = true;
                return Effect::Perform(Cmd::Initialize);
            }
            Msg::Initialized(catalog) => {
                self.loading = false;
                self.warning = [
                    &catalog.exercises.warning,
                    &catalog.body_parts.warning,
                    &catalog.equipments.warning,
                    &catalog.targets.warning,
                ]
                .into_iter()
                .flatten()
                .next()
                .cloned();
                self.exercises = catalog.exercises.items;
                self.body_parts = catalog.body_parts.items;
                self.equipments = catalog.equipments.items;
                self.targets = catalog.targets.items;
            }

            Msg::SearchTermChanged(search_term) => self.search_term = search_term,
            Msg::Search => {
                self.filter = None;
                return self.fetch_exercises();
            }
            Msg::FilterSelected(filter, value) => {
                self.search_term.clear();
                self.filter = (!value.is_empty()).then_some((filter, value));
                return self.fetch_exercises();
            }
            Msg::ClearFilters => {
                self.search_term.clear();
                self.filter = None;
                return self.fetch_exercises();
            }
            Msg::ExercisesFetched(listing) => {
                self.loading = false;
                self.exercises = listing.items;
                self.warning = listing.warning;
            }

            Msg::ShowDetails(idx) => {
                if idx < self.exercises.len() {
                    self.details = Some(idx);
                }
            }
            Msg::CloseDetails => self.details = None,

            Msg::AddToWorkout(idx) => {
                if let Some(exercise) = self.exercises.get(idx) {
                    return Effect::Perform(Cmd::Stage(Box::new(exercise.clone())));
                }
            }
            Msg::ExerciseStaged => return Effect::Navigate(Navigation::CreateWorkout),
        }

        Effect::None
    }

    async fn perform<S, C>(cmd: Cmd, context: &Context<S, C>) -> Msg
    where
        S: domain::WorkoutService,
        C: domain::CatalogRepository,
    {
        match cmd {
            Cmd::Initialize => Msg::Initialized(Box::new(Catalog {
                body_parts: context
                    .catalog
                    .filter_values(domain::CatalogFilter::BodyPart)
                    .await,
                equipments: context
                    .catalog
                    .filter_values(domain::CatalogFilter::Equipment)
                    .await,
                targets: context
                    .catalog
                    .filter_values(domain::CatalogFilter::Target)
                    .await,
                exercises: context
                    .catalog
                    .exercises(&domain::CatalogQuery::All)
                    .await,
            })),
            Cmd::FetchExercises(query) => {
                Msg::ExercisesFetched(context.catalog.exercises(&query).await)
            }
            Cmd::Stage(exercise) => {
                context.handoff.stage(*exercise);
                Msg::ExerciseStaged
            }
        }
    }
}

impl Model {
    fn fetch_exercises(&mut self) -> Effect<Cmd> {
        self.loading = true;
        self.details = None;
        Effect::Perform(Cmd::FetchExercises(self.query()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::dispatch;
    use crate::tests::fakes::{FakeCatalog, FakeWorkoutService, context};

    #[tokio::test]
    async fn test_initialize() {
        let context = context(vec![]);
        let mut model = init();

        dispatch(&mut model, Msg::Initialize, &context).await;

        assert!(!model.loading);
        assert_eq!(model.warning, None);
        assert_eq!(model.exercises.len(), 3);
        assert_eq!(model.body_parts, vec!["chest", "upper legs"]);
        assert_eq!(model.equipments, vec!["barbell"]);
        assert_eq!(model.targets, vec!["glutes"]);
        assert_eq!(
            *context.catalog.inner().queries.borrow(),
            vec![domain::CatalogQuery::All]
        );
    }

    #[tokio::test]
    async fn test_initialize_with_unavailable_catalog() {
        let context = Context::new(FakeWorkoutService::new(vec![]), FakeCatalog::unavailable());
        let mut model = init();

        dispatch(&mut model, Msg::Initialize, &context).await;

        assert!(!model.loading);
        assert_eq!(model.exercises, domain::catalog::example_exercises());
        assert_eq!(
            model.body_parts,
            domain::catalog::example_filter_values(domain::CatalogFilter::BodyPart)
        );
        assert_eq!(
            model.warning,
            Some(domain::catalog::FALLBACK_WARNING.to_string())
        );
    }

    #[tokio::test]
    async fn test_body_part_filter_with_unavailable_catalog() {
        let context = Context::new(FakeWorkoutService::new(vec![]), FakeCatalog::unavailable());
        let mut model = init();

        assert!(matches!(
            model.update(Msg::FilterSelected(
                domain::CatalogFilter::BodyPart,
                "chest".to_string()
            )),
            Effect::Perform(Cmd::FetchExercises(domain::CatalogQuery::BodyPart(_)))
        ));
        assert!(model.loading);

        dispatch(
            &mut model,
            Msg::FilterSelected(domain::CatalogFilter::BodyPart, "chest".to_string()),
            &context,
        )
        .await;

        assert!(!model.loading);
        assert_eq!(model.exercises, domain::catalog::example_exercises());
        assert_eq!(
            model.warning,
            Some(domain::catalog::FALLBACK_WARNING.to_string())
        );
    }

    #[rstest]
    #[case(
        Msg::FilterSelected(domain::CatalogFilter::Equipment, "barbell".to_string()),
        domain::CatalogQuery::Equipment("barbell".to_string())
    )]
    #[case(
        Msg::FilterSelected(domain::CatalogFilter::Target, "glutes".to_string()),
        domain::CatalogQuery::Target("glutes".to_string())
    )]
    #[case(
        Msg::FilterSelected(domain::CatalogFilter::BodyPart, String::new()),
        domain::CatalogQuery::All
    )]
    #[case(Msg::Search, domain::CatalogQuery::Name("push".to_string()))]
    #[case(Msg::ClearFilters, domain::CatalogQuery::All)]
    #[tokio::test]
    async fn test_query(#[case] msg: Msg, #[case] expected: domain::CatalogQuery) {
        let context = context(vec![]);
        let mut model = init();
        model.search_term = " push ".to_string();
        model.filter = Some((domain::CatalogFilter::BodyPart, "chest".to_string()));

        dispatch(&mut model, msg, &context).await;

        assert_eq!(*context.catalog.inner().queries.borrow(), vec![expected]);
    }

    #[tokio::test]
    async fn test_filter_resets_search_and_other_filters() {
        let context = context(vec![]);
        let mut model = init();
        model.search_term = "press".to_string();

        dispatch(
            &mut model,
            Msg::FilterSelected(domain::CatalogFilter::Target, "glutes".to_string()),
            &context,
        )
        .await;
        dispatch(
            &mut model,
            Msg::FilterSelected(domain::CatalogFilter::BodyPart, "chest".to_string()),
            &context,
        )
        .await;

        assert_eq!(model.search_term, "");
        assert_eq!(model.selected(domain::CatalogFilter::BodyPart), "chest");
        assert_eq!(model.selected(domain::CatalogFilter::Target), "");
        assert_eq!(
            model.exercises.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            vec!["barbell bench press", "push-up"]
        );
    }

    #[tokio::test]
    async fn test_details() {
        let context = context(vec![]);
        let mut model = init();
        dispatch(&mut model, Msg::Initialize, &context).await;

        dispatch(&mut model, Msg::ShowDetails(7), &context).await;
        assert_eq!(model.details, None);

        dispatch(&mut model, Msg::ShowDetails(2), &context).await;
        assert_eq!(model.details, Some(2));

        dispatch(&mut model, Msg::CloseDetails, &context).await;
        assert_eq!(model.details, None);
    }

    #[tokio::test]
    async fn test_add_to_workout_stages_exercise() {
        let context = context(vec![]);
        let mut model = init();
        dispatch(&mut model, Msg::Initialize, &context).await;

        assert_eq!(
            dispatch(&mut model, Msg::AddToWorkout(1), &context).await,
            Some(Navigation::CreateWorkout)
        );
        assert_eq!(
            context.handoff.take().map(|e| e.name),
            Some("barbell full squat".to_string())
        );
        assert_eq!(context.handoff.take(), None);
    }
}
