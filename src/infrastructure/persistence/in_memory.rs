//! Process-local repositories used when no `DATABASE_URL` is configured and by
//! the integration tests. Data does not survive a restart.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::application::ports::{
    AppointmentRepository, RepositoryError, StaffRepository, UserRepository,
};
use crate::domain::entities::{Appointment, Staff, User};
use crate::domain::value_objects::ResourceId;

#[derive(Default)]
pub struct InMemoryUserRepository {
    by_id: DashMap<ResourceId, User>,
    id_by_email: DashMap<String, ResourceId>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &ResourceId) -> Result<Option<User>, RepositoryError> {
        Ok(self.by_id.get(id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let Some(id) = self.id_by_email.get(email).map(|id| id.clone()) else {
            return Ok(None);
        };
        Ok(self.by_id.get(&id).map(|u| u.clone()))
    }

    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        match self.id_by_email.entry(user.email().to_string()) {
            Entry::Occupied(_) => Err(RepositoryError::AlreadyExists(user.email().to_string())),
            Entry::Vacant(slot) => {
                self.by_id.insert(user.id().clone(), user.clone());
                slot.insert(user.id().clone());
                Ok(())
            }
        }
    }

    async fn update_two_factor(&self, user: &User) -> Result<(), RepositoryError> {
        match self.by_id.get_mut(user.id()) {
            Some(mut stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(user.id().to_string())),
        }
    }
}

#[derive(Default)]
pub struct InMemoryStaffRepository {
    by_id: DashMap<ResourceId, Staff>,
    id_by_email: DashMap<String, ResourceId>,
}

impl InMemoryStaffRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[async_trait]
impl StaffRepository for InMemoryStaffRepository {
    async fn find_by_id(&self, id: &ResourceId) -> Result<Option<Staff>, RepositoryError> {
        Ok(self.by_id.get(id).map(|s| s.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Staff>, RepositoryError> {
        let Some(id) = self.id_by_email.get(email).map(|id| id.clone()) else {
            return Ok(None);
        };
        Ok(self.by_id.get(&id).map(|s| s.clone()))
    }

    async fn create(&self, staff: &Staff) -> Result<(), RepositoryError> {
        match self.id_by_email.entry(staff.email().to_string()) {
            Entry::Occupied(_) => Err(RepositoryError::AlreadyExists(staff.email().to_string())),
            Entry::Vacant(slot) => {
                self.by_id.insert(staff.id().clone(), staff.clone());
                slot.insert(staff.id().clone());
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct InMemoryAppointmentRepository {
    appointments: DashMap<ResourceId, Appointment>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn create(&self, appointment: &Appointment) -> Result<(), RepositoryError> {
        match self.appointments.entry(appointment.id().clone()) {
            Entry::Occupied(_) => Err(RepositoryError::AlreadyExists(appointment.id().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(appointment.clone());
                Ok(())
            }
        }
    }

    async fn find_by_id(&self, id: &ResourceId) -> Result<Option<Appointment>, RepositoryError> {
        Ok(self.appointments.get(id).map(|a| a.clone()))
    }

    async fn list_all(&self) -> Result<Vec<Appointment>, RepositoryError> {
        let mut all: Vec<Appointment> = self.appointments.iter().map(|a| a.clone()).collect();
        all.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        Ok(all)
    }

    async fn list_by_staff(
        &self,
        staff_id: &ResourceId,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let mut matching: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|a| a.staff_id() == staff_id)
            .map(|a| a.clone())
            .collect();
        matching.sort_by_key(|a| (a.date(), a.time()));
        Ok(matching)
    }

    async fn update(&self, appointment: &Appointment) -> Result<(), RepositoryError> {
        match self.appointments.get_mut(appointment.id()) {
            Some(mut stored) => {
                *stored = appointment.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(appointment.id().to_string())),
        }
    }

    async fn delete(&self, id: &ResourceId) -> Result<bool, RepositoryError> {
        Ok(self.appointments.remove(id).is_some())
    }
}
