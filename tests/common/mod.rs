//! Shared fixtures for integration tests.

#![allow(dead_code)]

use u_planfit::model::{
    CostShare, CostSharingPreference, ExpectedUsage, Plan, PlanBenefit, PriorityWeights,
    UserProfile,
};

/// Routes `tracing` output to the test harness. Set `RUST_LOG=u_planfit=debug`
/// to see scoring events.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub const EYE_EXAM: &str = "Routine Eye Exam for Children";
pub const CHILD_DENTAL: &str = "Basic Dental Care - Child";

pub fn profile(weights: PriorityWeights, usage: ExpectedUsage) -> UserProfile {
    UserProfile::new(2, 1, usage, weights, CostSharingPreference::Either)
        .expect("valid profile")
        .with_required_benefits([EYE_EXAM, CHILD_DENTAL])
}

/// Covered EHB benefit with the given in-network and out-of-network rates.
pub fn benefit(name: &str, in_network: f64, out_of_network: f64) -> PlanBenefit {
    PlanBenefit::new(name)
        .with_covered(true)
        .with_ehb(true)
        .with_coinsurance(CostShare::Percent(in_network))
        .with_out_of_network_coinsurance(CostShare::Percent(out_of_network))
}

/// A plan covering both required benefits at `rate` coinsurance.
pub fn full_plan(id: &str, rate: f64) -> Plan {
    Plan::new(id)
        .with_issuer("10001", "TX")
        .with_business_year(2025)
        .with_benefit(benefit(EYE_EXAM, rate, rate))
        .with_benefit(benefit(CHILD_DENTAL, rate, rate))
}

pub fn catalog() -> Vec<Plan> {
    vec![
        full_plan("PLAN-A", 0.0),
        full_plan("PLAN-B", 40.0),
        Plan::new("PLAN-C").with_benefit(benefit(EYE_EXAM, 0.0, 0.0)),
        Plan::new("PLAN-D")
            .with_benefit(benefit(EYE_EXAM, 0.0, 0.0).with_quantity_limit(1.0, "Exam(s) per Year"))
            .with_benefit(
                benefit(CHILD_DENTAL, 0.0, 0.0).with_quantity_limit(2.0, "Visit(s) per Year"),
            ),
        Plan::new("PLAN-E"),
    ]
}
