use crate::infra::{build_service, print_json, ApiPlanningService};
use clap::Args;
use event_planner::config::AppConfig;
use event_planner::error::AppError;
use event_planner::planning::{
    Goal, GoalCategory, Kpi, Level, ServiceRequirements, Stakeholder, VendorCandidate,
};
use std::collections::BTreeMap;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Event identifier stamped on every generated artifact
    #[arg(long, default_value = "demo-summit")]
    pub(crate) event_id: String,
    /// Print the full JSON artifacts instead of the condensed summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { event_id, json } = args;
    let config = AppConfig::load()?;
    let service = build_service(&config)?;

    println!("Event planning demo for {event_id}");
    render_goals(&service, &event_id, json)?;
    render_stakeholders(&service, &event_id, json)?;
    render_kpis(&service, &event_id, json)?;
    render_vendors(&service, &event_id, json)?;

    let stored = service.list(&event_id)?;
    println!("\n{} artifacts stored for {event_id}", stored.len());
    for summary in stored {
        println!("  - {} ({})", summary.artifact_id, summary.kind);
    }

    Ok(())
}

fn render_goals(service: &ApiPlanningService, event_id: &str, json: bool) -> Result<(), AppError> {
    let artifact = service.prioritize_goals(event_id, &sample_goals())?;
    if json {
        return print_json(&artifact);
    }

    println!("\nGoal priority matrix");
    for goal in &artifact.body.priority_matrix {
        println!(
            "  {}. {} [{}] score {:.1} | {}% of resources",
            goal.priority_rank,
            goal.title,
            goal.priority_tier,
            goal.score,
            goal.resource_allocation_percent
        );
    }
    for phase in &artifact.body.execution_roadmap {
        println!(
            "  Phase {} {}: {}",
            phase.phase,
            phase.phase_name,
            phase.goals.join(", ")
        );
    }
    Ok(())
}

fn render_stakeholders(
    service: &ApiPlanningService,
    event_id: &str,
    json: bool,
) -> Result<(), AppError> {
    let artifact = service.prioritize_stakeholders(event_id, &sample_stakeholders())?;
    if json {
        return print_json(&artifact);
    }

    println!("\nStakeholder map");
    for entry in &artifact.body.prioritized_list {
        println!(
            "  {}. {} score {} | {} | {} | {}% of engagement budget",
            entry.rank,
            entry.name,
            entry.priority_score,
            entry.salience_type.label(),
            entry.tier,
            entry.budget_percent
        );
    }
    Ok(())
}

fn render_kpis(service: &ApiPlanningService, event_id: &str, json: bool) -> Result<(), AppError> {
    let artifact = service.monitor_kpis(event_id, &sample_kpis())?;
    if json {
        return print_json(&artifact);
    }

    let summary = &artifact.body.summary;
    println!(
        "\nKPI dashboard: {} on track, {} at risk, {} off track, {} undetermined ({:?})",
        summary.on_track,
        summary.at_risk,
        summary.off_track,
        summary.undetermined,
        summary.overall_health
    );
    for status in &artifact.body.kpi_status {
        let variance = status
            .variance_pct
            .map(|variance| format!("{variance:+.1}%"))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  - {}: {} (variance {variance})",
            status.kpi_name,
            status.status.label()
        );
    }
    for alert in &artifact.body.alerts {
        println!(
            "  ! {} {} {:?}{}",
            alert.alert_id,
            alert.kpi_id,
            alert.severity,
            if alert.escalation_required {
                " - escalate"
            } else {
                ""
            }
        );
    }
    Ok(())
}

fn render_vendors(service: &ApiPlanningService, event_id: &str, json: bool) -> Result<(), AppError> {
    let artifact =
        service.evaluate_vendors(event_id, &sample_vendors(), &sample_requirements(), None)?;
    if json {
        return print_json(&artifact);
    }

    println!(
        "\nVendor ranking (recommended: {})",
        artifact.body.recommended_vendor
    );
    for ranking in &artifact.body.rankings {
        println!(
            "  {}. {} {:.1} [{}] {}",
            ranking.rank,
            ranking.vendor_name,
            ranking.overall_score,
            ranking.tier,
            ranking.recommendation
        );
    }
    for profile in &artifact.body.risk_assessment {
        for risk in &profile.risks {
            println!("  ! {} {}: {}", profile.vendor_id, risk.risk_type, risk.mitigation);
        }
    }
    Ok(())
}

fn sample_goals() -> Vec<Goal> {
    let goal = |id: &str, title: &str, category, impact, effort, ratings: &[(&str, f64)]| Goal {
        id: id.to_string(),
        title: title.to_string(),
        category,
        estimated_effort: effort,
        estimated_impact: impact,
        stakeholder_importance: ratings
            .iter()
            .map(|(name, rating)| (name.to_string(), *rating))
            .collect::<BTreeMap<_, _>>(),
    };

    vec![
        goal(
            "G-01",
            "Sell 1,200 delegate passes",
            GoalCategory::Revenue,
            Level::High,
            Level::Medium,
            &[("board", 5.0), ("sponsors", 4.0)],
        ),
        goal(
            "G-02",
            "Launch matchmaking app",
            GoalCategory::Networking,
            Level::Medium,
            Level::High,
            &[("attendees", 4.0)],
        ),
        goal(
            "G-03",
            "Publish session recordings",
            GoalCategory::Education,
            Level::Medium,
            Level::Low,
            &[],
        ),
        goal(
            "G-04",
            "Press coverage in trade media",
            GoalCategory::Brand,
            Level::Low,
            Level::Low,
            &[("marketing", 3.0)],
        ),
    ]
}

fn sample_stakeholders() -> Vec<Stakeholder> {
    let stakeholder = |id: &str, name: &str, power, interest, legitimacy, urgency| Stakeholder {
        id: id.to_string(),
        name: name.to_string(),
        role: None,
        power,
        interest,
        legitimacy: Some(legitimacy),
        urgency: Some(urgency),
    };

    vec![
        stakeholder("S-01", "Title sponsor", 9.0, 8.0, 8.0, 7.0),
        stakeholder("S-02", "Industry association", 2.0, 6.0, 9.0, 1.0),
        stakeholder("S-03", "Venue owner", 8.0, 4.0, 2.0, 1.0),
        stakeholder("S-04", "Local residents", 1.0, 1.0, 1.0, 1.0),
        stakeholder("S-05", "City permits office", 7.0, 5.0, 3.0, 9.0),
    ]
}

fn sample_kpis() -> Vec<Kpi> {
    let kpi = |id: &str, name: &str, target, current| Kpi {
        kpi_id: id.to_string(),
        kpi_name: name.to_string(),
        target,
        current,
    };

    vec![
        kpi("K-01", "Registrations", 1200.0, Some(1010.0)),
        kpi("K-02", "Sponsor revenue", 250000.0, Some(170000.0)),
        kpi("K-03", "Session NPS", 50.0, Some(22.0)),
        kpi("K-04", "App downloads", 800.0, None),
    ]
}

fn sample_vendors() -> Vec<VendorCandidate> {
    let vendor = |id: &str, name: &str, quote: f64, years: f64, events: u32, services: &[&str]| {
        VendorCandidate {
            vendor_id: id.to_string(),
            vendor_name: name.to_string(),
            quote_amount: quote,
            experience_years: Some(years),
            past_event_count: Some(events),
            client_references: None,
            response_time_hours: None,
            insurance_coverage: false,
            certifications: Vec::new(),
            offered_services: services.iter().map(|service| service.to_string()).collect(),
        }
    };

    let mut harbor = vendor(
        "V-01",
        "Harbor Catering",
        18_500.0,
        12.0,
        140,
        &["buffet catering", "bar service", "dietary menus"],
    );
    harbor.client_references = Some(14);
    harbor.response_time_hours = Some(3.0);
    harbor.insurance_coverage = true;
    harbor.certifications = vec!["food safety".to_string(), "alcohol licence".to_string()];

    let mut gourmet = vendor(
        "V-03",
        "Gourmet Events",
        24_000.0,
        9.0,
        70,
        &["plated catering", "bar service", "dessert bar"],
    );
    gourmet.client_references = Some(8);
    gourmet.response_time_hours = Some(20.0);
    gourmet.insurance_coverage = true;

    let mut budget = vendor("V-02", "Budget Bites", 12_000.0, 3.0, 25, &["buffet catering"]);
    budget.response_time_hours = Some(36.0);

    vec![
        harbor,
        budget,
        gourmet,
        vendor("V-04", "QuickServe", 15_000.0, 1.0, 4, &[]),
    ]
}

fn sample_requirements() -> ServiceRequirements {
    ServiceRequirements {
        must_have: vec!["catering".to_string(), "bar".to_string()],
        nice_to_have: vec!["dietary".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_event_produces_every_artifact() {
        let service = build_service(&test_config()).expect("service");

        service.prioritize_goals("demo", &sample_goals()).expect("goals");
        service
            .prioritize_stakeholders("demo", &sample_stakeholders())
            .expect("stakeholders");
        let dashboard = service.monitor_kpis("demo", &sample_kpis()).expect("kpis");
        let vendors = service
            .evaluate_vendors("demo", &sample_vendors(), &sample_requirements(), None)
            .expect("vendors");

        assert_eq!(dashboard.body.summary.undetermined, 1);
        assert_eq!(vendors.body.recommended_vendor, "V-01");
        assert_eq!(service.list("demo").expect("lists").len(), 4);
    }

    fn test_config() -> AppConfig {
        use event_planner::config::{AppEnvironment, ServerConfig, TelemetryConfig};
        AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            telemetry: TelemetryConfig {
                log_level: "warn".to_string(),
            },
            planning: Default::default(),
        }
    }
}
