use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    mask, CaseSession, FileCredentialStore, InvestigationState, LoadStatus, MaskKind,
    SessionSnapshot,
};
use shared::domain::TransactionId;
use shared::protocol::{KpiSnapshot, TransactionRecord};
use url::Url;

mod config;

#[derive(Parser, Debug)]
struct Args {
    /// Transaction to review.
    #[arg(default_value = "TX-999")]
    trans_id: String,
    /// Request a machine decision after loading the case.
    #[arg(long)]
    decide: bool,
    /// Run the deeper multi-step investigation.
    #[arg(long)]
    investigate: bool,
    /// Refresh aggregate KPIs for a trailing window of days.
    #[arg(long, value_name = "DAYS")]
    kpis: Option<u32>,
    /// Probe service connectivity before anything else.
    #[arg(long)]
    health: bool,
    /// Display PII fields unmasked.
    #[arg(long)]
    reveal_pii: bool,
    /// Persist an API key for this and future sessions.
    #[arg(long, value_name = "KEY")]
    save_api_key: Option<String>,
    /// Override the configured scoring service URL.
    #[arg(long)]
    server_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();
    let settings = config::load_settings();

    let api_base = args.server_url.unwrap_or(settings.api_base);
    let base_url = Url::parse(&api_base)
        .with_context(|| format!("invalid scoring service url '{api_base}'"))?;

    let store = FileCredentialStore::new(&settings.credentials_path);
    let session = CaseSession::new(base_url, store);

    if let Some(key) = &args.save_api_key {
        session.set_api_key(key).await;
        println!("API key saved.");
    }
    session.set_reveal_pii(args.reveal_pii).await;

    if args.health {
        match session.check_health().await {
            Ok(health) => println!("Service {} (version {})", health.status, health.version),
            Err(err) => println!("Service unreachable: {}", err.message()),
        }
    }

    let trans_id = TransactionId::from(args.trans_id.as_str());
    session.load_case(trans_id.clone()).await;
    if args.decide {
        session.request_decision(trans_id.clone()).await;
    }
    if args.investigate {
        session.run_investigation(trans_id.clone()).await;
    }
    if let Some(window_days) = args.kpis {
        session.refresh_kpis(window_days).await;
    }

    render(&session.snapshot().await);
    Ok(())
}

fn render(snapshot: &SessionSnapshot) {
    if let Some(message) = &snapshot.last_error {
        println!("!! {message}");
    }

    match snapshot.case_status {
        LoadStatus::Loaded => render_case(snapshot),
        LoadStatus::Error => println!("No case to display."),
        LoadStatus::Loading | LoadStatus::Idle => {}
    }

    if let Some(decision) = snapshot.effective_decision() {
        println!();
        println!(
            "Decision: {} (risk {:.2}, model {})",
            decision.decision, decision.risk_score, decision.model_version
        );
        for code in &decision.reason_codes {
            println!("  reason: {code}");
        }
        for rule in &decision.rule_hits {
            println!("  rule:   {rule}");
        }
        if let Some(event_id) = &decision.decision_event_id {
            println!("  event:  {event_id}");
        }
    }

    match snapshot.investigation_state {
        InvestigationState::Running => println!("Investigation running..."),
        InvestigationState::Completed => {
            if let Some(investigation) = &snapshot.investigation {
                if let Some(dir) = &investigation.artifacts_dir {
                    println!("  artifacts: {dir}");
                }
                if let Some(outputs) = &investigation.agent_outputs {
                    println!("  agent outputs:");
                    println!("{}", pretty(outputs));
                }
            }
        }
        InvestigationState::Idle => {}
    }

    if let Some(kpis) = &snapshot.kpis {
        render_kpis(kpis);
    }
}

fn render_case(snapshot: &SessionSnapshot) {
    let Some(case) = &snapshot.case else {
        return;
    };
    if !case.found {
        println!("Case {} not found.", snapshot.trans_id);
        return;
    }
    let Some(tx) = &case.transaction else {
        println!("Case {} has no transaction record.", snapshot.trans_id);
        return;
    };

    println!("Case {}", tx.trans_id);
    render_transaction(tx, snapshot.reveal_pii);

    if let Some(similar) = &case.similar_cases {
        if !similar.similar_cases.is_empty() {
            println!("  similar cases:");
            for entry in &similar.similar_cases {
                let distance = entry
                    .distance
                    .map(|d| format!(" (distance {d:.3})"))
                    .unwrap_or_default();
                let reason = entry.reason.as_deref().unwrap_or("-");
                println!("    {}{distance}: {reason}", entry.trans_id);
            }
        }
    }

    for (label, block) in [
        ("user history", &case.user_history),
        ("ip intel", &case.ip_intel),
        ("kyc", &case.kyc),
        ("disputes", &case.disputes),
    ] {
        if let Some(value) = block {
            println!("  {label}:");
            println!("{}", pretty(value));
        }
    }
}

fn render_transaction(tx: &TransactionRecord, reveal: bool) {
    println!("  amount:    ${:.2}", tx.amount);
    if let Some(merchant) = &tx.merchant {
        println!("  merchant:  {merchant}");
    }
    if let Some(timestamp) = &tx.timestamp {
        println!("  time:      {timestamp}");
    }
    let name = tx.name.as_deref().unwrap_or("User");
    let email = tx.email.as_deref().unwrap_or("");
    println!(
        "  customer:  {} ({})",
        mask(name, MaskKind::Text, reveal),
        mask(email, MaskKind::Email, reveal)
    );
    if let Some(device_ip) = &tx.device_ip {
        println!("  device ip: {}", mask(device_ip, MaskKind::Text, reveal));
    }
    if let Some(home_ip) = &tx.home_ip {
        println!("  home ip:   {}", mask(home_ip, MaskKind::Text, reveal));
    }
    if let Some(addr) = &tx.shipping_addr {
        println!("  ship to:   {}", mask(addr, MaskKind::Text, reveal));
    }
    if let Some(addr) = &tx.billing_addr {
        println!("  bill to:   {}", mask(addr, MaskKind::Text, reveal));
    }
    if let Some(country) = &tx.country {
        println!("  country:   {country}");
    }
    if let Some(age) = tx.account_age_days {
        println!("  acct age:  {age} days");
    }
    if let Some(vip) = &tx.vip_status {
        println!("  vip:       {vip}");
    }
}

fn render_kpis(kpis: &KpiSnapshot) {
    println!();
    println!("KPIs (last {} days)", kpis.window_days);
    println!("  events:      {}", kpis.total_events);
    println!("  volume:      ${:.2}", kpis.total_volume);
    println!("  allow rate:  {:.1}%", kpis.allow_rate * 100.0);
    println!("  challenge:   {:.1}%", kpis.challenge_rate * 100.0);
    println!("  decline:     {:.1}%", kpis.decline_rate * 100.0);
    println!("  chargebacks: ${:.2}", kpis.chargeback_amount);
    println!("  loss proxy:  {:.2}%", kpis.loss_rate_proxy * 100.0);
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
