//! Sample collections written on first access when seeding is enabled.

use chrono::NaiveDate;

use crate::model::{
    AnalysisStatus, Comment, Initiative, InitiativeStatus, RootCauseRecord,
};

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// The sample initiatives.
#[must_use]
pub fn initiatives() -> Vec<Initiative> {
    vec![
        Initiative {
            id: "1".to_string(),
            title: "Reduce Setup Time for Machine A".to_string(),
            date_started: day(2024, 1, 10),
            date_completed: Some(day(2024, 2, 15)),
            department: "Production".to_string(),
            problem_statement: "Machine A setup takes 45 minutes, causing production delays"
                .to_string(),
            root_cause_summary:
                "Tools not organized, unclear procedures, multiple adjustments needed".to_string(),
            action_plan:
                "Implement 5S methodology, create setup checklist, standardize tool placement"
                    .to_string(),
            owner: "John Smith".to_string(),
            status: InitiativeStatus::Completed,
            before_kpis: "Setup time: 45 minutes, Daily production: 150 units".to_string(),
            after_kpis: "Setup time: 20 minutes, Daily production: 180 units".to_string(),
            // 25 min * 5 setups/day * 30 days / 60
            time_saved: 125.0,
            // $30/hour * 125 hours
            cost_savings: 3750.0,
            date_created: day(2024, 1, 10),
            date_modified: day(2024, 2, 15),
            comments: vec![Comment {
                id: "c1".to_string(),
                text: "Great improvement! The new setup procedure is much clearer.".to_string(),
                author: "Sarah Johnson".to_string(),
                date: day(2024, 2, 10),
            }],
        },
        Initiative {
            id: "2".to_string(),
            title: "Improve Quality Control Process".to_string(),
            date_started: day(2024, 2, 1),
            date_completed: None,
            department: "Quality".to_string(),
            problem_statement: "High defect rate in final inspection (8%)".to_string(),
            root_cause_summary:
                "Insufficient training, outdated procedures, inadequate testing equipment"
                    .to_string(),
            action_plan:
                "Update procedures, provide additional training, upgrade testing equipment"
                    .to_string(),
            owner: "Mike Davis".to_string(),
            status: InitiativeStatus::InProgress,
            before_kpis: "Defect rate: 8%, Inspection time: 15 min/unit".to_string(),
            after_kpis: "Target: Defect rate <3%, Inspection time: 12 min/unit".to_string(),
            time_saved: 0.0,
            cost_savings: 0.0,
            date_created: day(2024, 2, 1),
            date_modified: day(2024, 2, 20),
            comments: vec![Comment {
                id: "c2".to_string(),
                text: "Training sessions scheduled for next week.".to_string(),
                author: "Mike Davis".to_string(),
                date: day(2024, 2, 18),
            }],
        },
        Initiative {
            id: "3".to_string(),
            title: "Streamline Inventory Management".to_string(),
            date_started: day(2023, 11, 15),
            date_completed: Some(day(2024, 1, 30)),
            department: "Supply Chain".to_string(),
            problem_statement: "Excessive inventory holding costs and frequent stockouts"
                .to_string(),
            root_cause_summary:
                "Manual tracking, poor demand forecasting, no automated reorder points"
                    .to_string(),
            action_plan: "Implement inventory management system, set automated reorder points, improve forecasting".to_string(),
            owner: "Lisa Chen".to_string(),
            status: InitiativeStatus::Completed,
            before_kpis: "Inventory holding cost: $50K/month, Stockouts: 15/month".to_string(),
            after_kpis: "Inventory holding cost: $35K/month, Stockouts: 3/month".to_string(),
            time_saved: 80.0,
            // $15K/month * 3 months
            cost_savings: 45000.0,
            date_created: day(2023, 11, 15),
            date_modified: day(2024, 1, 30),
            comments: Vec::new(),
        },
    ]
}

/// The sample root cause analyses.
#[must_use]
pub fn root_causes() -> Vec<RootCauseRecord> {
    vec![
        RootCauseRecord {
            id: "1".to_string(),
            title: "Production Line Downtime".to_string(),
            problem_statement: "Production line stopped unexpectedly causing 2-hour delay"
                .to_string(),
            whys: [
                "Machine sensor malfunctioned".to_string(),
                "Sensor was not calibrated properly".to_string(),
                "Calibration schedule was not followed".to_string(),
                "No clear responsibility for calibration".to_string(),
                "Lack of documented maintenance procedures".to_string(),
            ],
            root_cause_summary:
                "Missing documented maintenance procedures and unclear responsibilities"
                    .to_string(),
            corrective_actions: "Create maintenance SOPs and assign clear ownership".to_string(),
            status: AnalysisStatus::Final,
            owner: "Alex Johnson".to_string(),
            date_created: day(2024, 1, 15),
            date_modified: day(2024, 1, 16),
        },
        RootCauseRecord {
            id: "2".to_string(),
            title: "Quality Control Issue".to_string(),
            problem_statement: "Defective products found in final inspection".to_string(),
            whys: [
                "Quality check missed defects".to_string(),
                "Inspector was rushed".to_string(),
                "High workload during shift".to_string(),
                "Understaffed quality department".to_string(),
                "Budget constraints on hiring".to_string(),
            ],
            root_cause_summary:
                "Insufficient staffing in quality department due to budget constraints"
                    .to_string(),
            corrective_actions: "Request budget approval for additional QC staff".to_string(),
            status: AnalysisStatus::Draft,
            owner: "Sarah Smith".to_string(),
            date_created: day(2024, 1, 20),
            date_modified: day(2024, 1, 20),
        },
    ]
}
