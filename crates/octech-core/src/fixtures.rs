//! Static sample records standing in for a real data source.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use octech_schema::{
    Activity, Appointment, AppointmentStatus, Client, ClientStatus, ClientType, DashboardOverview,
    DashboardStat, ServiceListing, Testimonial, UpcomingAppointment,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub fn clients() -> Vec<Client> {
    vec![
        Client {
            id: "1".into(),
            name: "John Smith".into(),
            email: "john@example.com".into(),
            phone: "(714) 555-1234".into(),
            company: None,
            client_type: ClientType::Residential,
            status: ClientStatus::Active,
            last_contact: date(2023, 6, 15),
            notes: Some("Home network setup and security camera installation".into()),
        },
        Client {
            id: "2".into(),
            name: "Acme Corporation".into(),
            email: "info@acmecorp.com".into(),
            phone: "(949) 555-5678".into(),
            company: Some("Acme Corp".into()),
            client_type: ClientType::Business,
            status: ClientStatus::Active,
            last_contact: date(2023, 6, 10),
            notes: Some("Office network maintenance contract".into()),
        },
        Client {
            id: "3".into(),
            name: "Sarah Johnson".into(),
            email: "sarah@email.com".into(),
            phone: "(657) 555-9012".into(),
            company: None,
            client_type: ClientType::Residential,
            status: ClientStatus::Lead,
            last_contact: date(2023, 6, 5),
            notes: Some("Interested in smart home setup".into()),
        },
        Client {
            id: "4".into(),
            name: "Tech Solutions LLC".into(),
            email: "contact@techsolutions.com".into(),
            phone: "(562) 555-3456".into(),
            company: Some("Tech Solutions".into()),
            client_type: ClientType::Business,
            status: ClientStatus::Inactive,
            last_contact: date(2023, 5, 20),
            notes: Some("Previous client, may need follow-up".into()),
        },
        Client {
            id: "5".into(),
            name: "Michael Brown".into(),
            email: "michael@example.com".into(),
            phone: "(714) 555-7890".into(),
            company: None,
            client_type: ClientType::Residential,
            status: ClientStatus::Active,
            last_contact: date(2023, 6, 12),
            notes: Some("Regular computer maintenance client".into()),
        },
    ]
}

/// Calendar fixtures placed relative to `now`: one today, one tomorrow and
/// one the day after.
pub fn appointments(now: DateTime<Utc>) -> Vec<Appointment> {
    let today_at = |hour: u32| {
        let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default();
        now.date_naive().and_time(time).and_utc()
    };

    let tomorrow = now + Duration::days(1);
    let day_after = now + Duration::days(2);

    vec![
        Appointment {
            id: "1".into(),
            title: "Network Setup - Acme Corp".into(),
            start: today_at(10),
            end: today_at(12),
            client: "Acme Corporation".into(),
            email: "contact@acmecorp.com".into(),
            phone: "(949) 555-1234".into(),
            service: "Network Setup & Troubleshooting".into(),
            notes: Some("Complete office network setup with 5 workstations".into()),
            status: AppointmentStatus::Confirmed,
        },
        Appointment {
            id: "2".into(),
            title: "Security Camera - Sarah Johnson".into(),
            start: tomorrow,
            end: tomorrow + Duration::hours(1),
            client: "Sarah Johnson".into(),
            email: "sarah@example.com".into(),
            phone: "(714) 555-5678".into(),
            service: "Security Camera Installation".into(),
            notes: Some("Install 3 outdoor cameras and setup mobile app".into()),
            status: AppointmentStatus::Pending,
        },
        Appointment {
            id: "3".into(),
            title: "Computer Repair - Michael Brown".into(),
            start: day_after,
            end: day_after + Duration::hours(1),
            client: "Michael Brown".into(),
            email: "michael@example.com".into(),
            phone: "(657) 555-9012".into(),
            service: "Computer Repair & Maintenance".into(),
            notes: None,
            status: AppointmentStatus::Confirmed,
        },
    ]
}

pub fn services() -> Vec<ServiceListing> {
    vec![
        ServiceListing {
            id: 1,
            title: "Security Camera Installation".into(),
            description: "Professional setup of wired/wireless security cameras with mobile app configuration.".into(),
            price_range: "$150-$250 per camera".into(),
            icon: "shield".into(),
        },
        ServiceListing {
            id: 2,
            title: "Wi-Fi Network Setup".into(),
            description: "Expert installation of routers and mesh systems for optimal home or office coverage.".into(),
            price_range: "$150-$300".into(),
            icon: "wifi".into(),
        },
        ServiceListing {
            id: 3,
            title: "Computer Setup & Tune-Up".into(),
            description: "New PC setup, updates, and performance optimization to keep your systems running smoothly.".into(),
            price_range: "$100-$150 each".into(),
            icon: "laptop".into(),
        },
    ]
}

pub fn testimonials() -> Vec<Testimonial> {
    vec![
        Testimonial {
            name: "Sarah Johnson".into(),
            company: Some("Local Boutique Owner".into()),
            content: "The security camera installation was quick and professional. Now I can monitor my store from anywhere!".into(),
            rating: 5,
        },
        Testimonial {
            name: "Michael Rodriguez".into(),
            company: Some("Small Law Firm".into()),
            content: "Our office network has never been more reliable. Response time for support is always fast.".into(),
            rating: 5,
        },
        Testimonial {
            name: "Jennifer Lee".into(),
            company: None,
            content: "Fixed my computer issues remotely in under an hour. Saved me so much time and frustration!".into(),
            rating: 5,
        },
    ]
}

pub fn dashboard() -> DashboardOverview {
    let stat = |title: &str, value: &str, change: &str| DashboardStat {
        title: title.into(),
        value: value.into(),
        change: change.into(),
    };
    let activity = |id, kind: &str, name: &str, company: &str, time: &str| Activity {
        id,
        kind: kind.into(),
        name: name.into(),
        company: company.into(),
        time: time.into(),
    };
    let upcoming = |id, client: &str, service: &str, date: &str| UpcomingAppointment {
        id,
        client: client.into(),
        service: service.into(),
        date: date.into(),
    };

    DashboardOverview {
        stats: vec![
            stat("Total Clients", "42", "+4% from last month"),
            stat("Active Tickets", "7", "-2 from last week"),
            stat("Pending Invoices", "$4,320", "5 invoices pending"),
            stat("Monthly Revenue", "$8,750", "+12% from last month"),
        ],
        recent_activities: vec![
            activity(1, "New Client", "Sarah Johnson", "Coastal Realty", "2 hours ago"),
            activity(2, "Service Request", "Mike Chen", "Chen Accounting", "4 hours ago"),
            activity(3, "Invoice Paid", "Robert Garcia", "Garcia Law", "1 day ago"),
            activity(4, "Ticket Closed", "Emily Wong", "Wong Dental", "1 day ago"),
        ],
        upcoming_appointments: vec![
            upcoming(1, "Coastal Realty", "Network Setup", "Today, 2:00 PM"),
            upcoming(2, "Chen Accounting", "Security Camera Installation", "Tomorrow, 10:00 AM"),
            upcoming(3, "Wong Dental", "Backup Solution Setup", "May 15, 1:30 PM"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn fixture_ids_are_unique() {
        let clients = clients();
        let ids: HashSet<_> = clients.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), clients.len());

        let appointments = appointments(Utc::now());
        let ids: HashSet<_> = appointments.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), appointments.len());
    }

    #[test]
    fn appointments_start_with_mixed_statuses() {
        let statuses: Vec<_> = appointments(Utc::now()).iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            [
                AppointmentStatus::Confirmed,
                AppointmentStatus::Pending,
                AppointmentStatus::Confirmed
            ]
        );
    }

    #[test]
    fn first_appointment_is_today_from_ten_to_noon() {
        let now = Utc::now();
        let first = &appointments(now)[0];
        assert_eq!(first.start.date_naive(), now.date_naive());
        assert_eq!(first.end - first.start, Duration::hours(2));
    }
}
