use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use octech_schema::{Appointment, AppointmentStatus};
use serde::Deserialize;

use crate::FilterError;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AppointmentError {
    #[error("appointment not found: {0}")]
    NotFound(String),
    #[error("too many pending appointments ({0})")]
    BookFull(usize),
}

/// Pending appointments accepted from the public booking form before new
/// ones are refused.
pub const MAX_PENDING_BOOKINGS: usize = 200;

/// Sets the status directly. Every transition is permitted, including a
/// transition to the current status; there is no terminal state.
pub fn change_status(appointment: &mut Appointment, target: AppointmentStatus) -> AppointmentStatus {
    std::mem::replace(&mut appointment.status, target)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentTab {
    #[default]
    All,
    Confirmed,
    Pending,
    Completed,
    Cancelled,
}

impl AppointmentTab {
    fn admits(&self, status: AppointmentStatus) -> bool {
        match self {
            AppointmentTab::All => true,
            AppointmentTab::Confirmed => status == AppointmentStatus::Confirmed,
            AppointmentTab::Pending => status == AppointmentStatus::Pending,
            AppointmentTab::Completed => status == AppointmentStatus::Completed,
            AppointmentTab::Cancelled => status == AppointmentStatus::Cancelled,
        }
    }
}

impl FromStr for AppointmentTab {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "confirmed" => Ok(Self::Confirmed),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(FilterError::UnknownTab(other.to_string())),
        }
    }
}

pub fn filter_appointments(
    appointments: &[Appointment],
    tab: AppointmentTab,
    search: &str,
) -> Vec<Appointment> {
    let needle = search.to_lowercase();
    appointments
        .iter()
        .filter(|a| tab.admits(a.status))
        .filter(|a| {
            a.client.to_lowercase().contains(&needle) || a.email.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// The admin calendar's appointments. Appointments are added, never removed.
#[derive(Debug, Clone)]
pub struct AppointmentBook {
    appointments: Vec<Appointment>,
    pending_cap: usize,
}

impl AppointmentBook {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments,
            pending_cap: MAX_PENDING_BOOKINGS,
        }
    }

    pub fn with_pending_cap(mut self, pending_cap: usize) -> Self {
        self.pending_cap = pending_cap;
        self
    }

    pub fn list(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn get(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn set_status(
        &mut self,
        id: &str,
        target: AppointmentStatus,
    ) -> Result<&Appointment, AppointmentError> {
        let appointment = self
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppointmentError::NotFound(id.to_string()))?;
        let previous = change_status(appointment, target);
        tracing::info!(
            appointment = %appointment.id,
            from = %previous,
            to = %target,
            "appointment status changed"
        );
        Ok(appointment)
    }

    /// Adds a pending one-hour appointment and returns its id.
    ///
    /// A resubmission of a still-pending booking (same email, service and
    /// start) returns the existing id. Once `pending_cap` appointments are
    /// pending, new bookings are refused.
    pub fn add_pending(
        &mut self,
        client: &str,
        email: &str,
        phone: &str,
        service: &str,
        start: DateTime<Utc>,
    ) -> Result<String, AppointmentError> {
        let mut pending = 0;
        for a in &self.appointments {
            if a.status != AppointmentStatus::Pending {
                continue;
            }
            if a.start == start && a.service == service && a.email.eq_ignore_ascii_case(email) {
                return Ok(a.id.clone());
            }
            pending += 1;
        }
        if pending >= self.pending_cap {
            return Err(AppointmentError::BookFull(pending));
        }

        let id = self.next_id();
        self.appointments.push(Appointment {
            id: id.clone(),
            title: format!("{service} - {client}"),
            start,
            end: start + Duration::hours(1),
            client: client.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            service: service.to_string(),
            notes: None,
            status: AppointmentStatus::Pending,
        });
        Ok(id)
    }

    fn next_id(&self) -> String {
        let max = self
            .appointments
            .iter()
            .filter_map(|a| a.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }
}
