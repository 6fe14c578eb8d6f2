use log::{debug, error};

use crate::{
    CreateError, DeleteError, NewWorkout, ReadError, UpdateError, Workout, WorkoutID,
    WorkoutRepository, WorkoutService, WorkoutSummary, sort_by_date_descending,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: WorkoutRepository> WorkoutService for Service<R> {
    async fn get_workouts(&self) -> Result<Vec<WorkoutSummary>, ReadError> {
        let mut workouts = log_on_error!(
            self.repository.read_workouts(),
            ReadError,
            "get",
            "workouts"
        )?;
        sort_by_date_descending(&mut workouts);
        Ok(workouts)
    }

    async fn get_workout(&self, id: WorkoutID) -> Result<Workout, ReadError> {
        log_on_error!(
            self.repository.read_workout(id),
            ReadError,
            "get",
            "workout"
        )
    }

    async fn get_workouts_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<WorkoutSummary>, ReadError> {
        let mut workouts = log_on_error!(
            self.repository.read_workouts_by_category(category),
            ReadError,
            "get",
            "workouts by category"
        )?;
        sort_by_date_descending(&mut workouts);
        Ok(workouts)
    }

    async fn create_workout(&self, workout: NewWorkout) -> Result<Workout, CreateError> {
        log_on_error!(
            self.repository.create_workout(workout),
            CreateError,
            "create",
            "workout"
        )
    }

    async fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError> {
        log_on_error!(
            self.repository.replace_workout(workout),
            UpdateError,
            "replace",
            "workout"
        )
    }

    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
        log_on_error!(
            self.repository.delete_workout(id),
            DeleteError,
            "delete",
            "workout"
        )
    }

    async fn like_workout(&self, id: WorkoutID) -> Result<u32, UpdateError> {
        log_on_error!(
            self.repository.increment_likes(id),
            UpdateError,
            "like",
            "workout"
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Name, StorageError};

    struct FakeRepository {
        workouts: RefCell<Vec<Workout>>,
        connected: bool,
    }

    impl FakeRepository {
        fn new(workouts: Vec<Workout>) -> Self {
            Self {
                workouts: RefCell::new(workouts),
                connected: true,
            }
        }

        fn check_connection(&self) -> Result<(), StorageError> {
            if self.connected {
                Ok(())
            } else {
                Err(StorageError::NoConnection)
            }
        }
    }

    impl WorkoutRepository for FakeRepository {
        async fn read_workouts(&self) -> Result<Vec<WorkoutSummary>, ReadError> {
            self.check_connection()?;
            Ok(self.workouts.borrow().iter().map(Workout::summary).collect())
        }

        async fn read_workout(&self, id: WorkoutID) -> Result<Workout, ReadError> {
            self.check_connection()?;
            self.workouts
                .borrow()
                .iter()
                .find(|w| w.id == id)
                .cloned()
                .ok_or(ReadError::NotFound)
        }

        async fn read_workouts_by_category(
            &self,
            category: &str,
        ) -> Result<Vec<WorkoutSummary>, ReadError> {
            self.check_connection()?;
            Ok(self
                .workouts
                .borrow()
                .iter()
                .filter(|w| w.has_body_part(category))
                .map(Workout::summary)
                .collect())
        }

        async fn create_workout(&self, workout: NewWorkout) -> Result<Workout, CreateError> {
            self.check_connection()?;
            let id = WorkoutID::from(self.workouts.borrow().len() as u64 + 1);
            let workout = workout.with_id(id);
            self.workouts.borrow_mut().push(workout.clone());
            Ok(workout)
        }

        async fn replace_workout(&self, workout: Workout) -> Result<Workout, UpdateError> {
            self.check_connection()?;
            let mut workouts = self.workouts.borrow_mut();
            let stored = workouts
                .iter_mut()
                .find(|w| w.id == workout.id)
                .ok_or(UpdateError::NotFound)?;
            *stored = workout.clone();
            Ok(workout)
        }

        async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
            self.check_connection()?;
            self.workouts.borrow_mut().retain(|w| w.id != id);
            Ok(id)
        }

        async fn increment_likes(&self, id: WorkoutID) -> Result<u32, UpdateError> {
            self.check_connection()?;
            let mut workouts = self.workouts.borrow_mut();
            let stored = workouts
                .iter_mut()
                .find(|w| w.id == id)
                .ok_or(UpdateError::NotFound)?;
            stored.likes += 1;
            Ok(stored.likes)
        }
    }

    fn workout(id: u64, day: u32) -> Workout {
        Workout {
            id: id.into(),
            name: Name::new(&format!("W{id}")).unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            likes: 0,
            exercises: vec![],
        }
    }

    #[tokio::test]
    async fn test_get_workouts_sorted_by_date() {
        let service = Service::new(FakeRepository::new(vec![
            workout(1, 3),
            workout(2, 10),
            workout(3, 1),
        ]));

        assert_eq!(
            service
                .get_workouts()
                .await
                .unwrap()
                .iter()
                .map(|w| *w.id)
                .collect::<Vec<_>>(),
            vec![2, 1, 3]
        );
    }

    #[tokio::test]
    async fn test_get_workout_not_found() {
        let service = Service::new(FakeRepository::new(vec![workout(1, 3)]));

        assert!(matches!(
            service.get_workout(2.into()).await,
            Err(ReadError::NotFound)
        ));
        assert_eq!(service.get_workout(1.into()).await.unwrap(), workout(1, 3));
    }

    #[tokio::test]
    async fn test_like_workout() {
        let service = Service::new(FakeRepository::new(vec![workout(1, 3)]));

        assert_eq!(service.like_workout(1.into()).await.unwrap(), 1);
        assert_eq!(service.like_workout(1.into()).await.unwrap(), 2);
        assert!(matches!(
            service.like_workout(5.into()).await,
            Err(UpdateError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_no_connection() {
        let service = Service::new(FakeRepository {
            connected: false,
            ..FakeRepository::new(vec![workout(1, 3)])
        });

        assert!(matches!(
            service.get_workouts().await,
            Err(ReadError::Storage(StorageError::NoConnection))
        ));
        assert!(matches!(
            service.delete_workout(1.into()).await,
            Err(DeleteError::Storage(StorageError::NoConnection))
        ));
        assert_eq!(service.repository().workouts.borrow().len(), 1);
    }
}
