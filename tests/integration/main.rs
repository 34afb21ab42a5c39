//! Integration tests for the arbitrage finder.
//!
//! Most tests run the public pipeline against the mock odds source. Tests that
//! hit The Odds API need a valid API_KEY environment variable.
//! Run them with: cargo test --test integration -- --ignored
//!
//! Note: each live test spends request quota.

use rust_decimal_macros::dec;
use time::{Duration, OffsetDateTime};

use sports_arb::arbitrage::{scan, ScanParams};
use sports_arb::config::Config;
use sports_arb::error::ApiError;
use sports_arb::odds::{
    MockFailure, MockMatchBuilder, MockOddsClient, OddsApiClient, OddsSource, Region,
};
use sports_arb::report::{render_json, render_text, ReportHeader};

/// Get a live config from environment.
fn live_config() -> Option<Config> {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("API_KEY").ok().filter(|k| !k.is_empty())?;

    Some(Config {
        api_key: Some(api_key),
        ..Config::default()
    })
}

fn params(sports: &[&str]) -> ScanParams {
    ScanParams {
        region: Region::Eu,
        cutoff: dec!(0.05),
        live: false,
        unit: dec!(100),
        sports: sports.iter().map(|s| s.to_string()).collect(),
    }
}

fn source() -> MockOddsClient {
    let tomorrow = OffsetDateTime::now_utc() + Duration::days(1);
    let yesterday = OffsetDateTime::now_utc() - Duration::days(1);

    let three_way = MockMatchBuilder::new("Arsenal", "Chelsea", "soccer_epl")
        .starts_at(tomorrow)
        .bookmaker(
            "Unibet",
            &[
                ("Arsenal", dec!(3.10)),
                ("Draw", dec!(3.20)),
                ("Chelsea", dec!(2.40)),
            ],
        )
        .bookmaker(
            "Pinnacle",
            &[
                ("Arsenal", dec!(2.90)),
                ("Draw", dec!(3.70)),
                ("Chelsea", dec!(2.50)),
            ],
        )
        .bookmaker(
            "Betfair",
            &[
                ("Arsenal", dec!(3.00)),
                ("Draw", dec!(3.40)),
                ("Chelsea", dec!(3.30)),
            ],
        )
        .build();
    let started = MockMatchBuilder::new("Liverpool", "Everton", "soccer_epl")
        .starts_at(yesterday)
        .bookmaker("Unibet", &[("Liverpool", dec!(2.50)), ("Everton", dec!(2.50))])
        .build();
    let vig = MockMatchBuilder::new("Chiefs", "Texans", "americanfootball_nfl")
        .starts_at(tomorrow)
        .bookmaker("DraftKings", &[("Chiefs", dec!(1.45)), ("Texans", dec!(2.75))])
        .bookmaker("FanDuel", &[("Chiefs", dec!(1.48)), ("Texans", dec!(2.70))])
        .build();

    MockOddsClient::new()
        .with_sport("soccer_epl", vec![three_way, started])
        .with_sport("americanfootball_nfl", vec![vig])
}

#[tokio::test]
async fn three_way_market_is_found_and_sized() {
    let source = source();

    let found = scan(&source, &params(&[])).await.unwrap();

    assert_eq!(found.len(), 1);
    let opp = &found[0];
    assert_eq!(opp.match_name, "Arsenal v. Chelsea");
    assert_eq!(opp.best_outcome_odds.len(), 3);

    let books: Vec<_> = opp.best_outcome_odds.iter().map(|s| s.bookmaker.as_str()).collect();
    assert_eq!(books, vec!["Unibet", "Pinnacle", "Betfair"]);

    // 1/3.1 + 1/3.7 + 1/3.3 = 0.8959
    assert_eq!(opp.total_implied_odds.round_dp(4), dec!(0.8959));
    let staked: rust_decimal::Decimal = opp.best_outcome_odds.iter().map(|s| s.stake).sum();
    assert!((staked - dec!(100)).abs() <= dec!(0.03));
    assert!(opp.min_profit.amount > dec!(11));
    assert!(opp.max_profit.amount >= opp.min_profit.amount);
    assert!(opp.hours_to_start > 23.0);

    let fetched = source.requests();
    assert_eq!(
        fetched,
        vec![
            ("americanfootball_nfl".to_string(), Region::Eu),
            ("soccer_epl".to_string(), Region::Eu),
        ]
    );
}

#[tokio::test]
async fn live_scan_includes_started_matches() {
    let params = ScanParams {
        live: true,
        ..params(&["soccer"])
    };

    let found = scan(&source(), &params).await.unwrap();

    let names: Vec<_> = found.iter().map(|o| o.match_name.as_str()).collect();
    assert_eq!(names, vec!["Arsenal v. Chelsea", "Liverpool v. Everton"]);
    assert!(found[1].hours_to_start < 0.0);
}

#[tokio::test]
async fn failed_sport_aborts_scan() {
    let source = source().fail_odds("tennis_atp", MockFailure::Server);

    let err = scan(&source, &params(&[])).await.unwrap_err();

    assert!(matches!(err, ApiError::Api { status: 500, .. }));
}

#[tokio::test]
async fn reports_render_scan_output() {
    let found = scan(&source(), &params(&["soccer"])).await.unwrap();

    let text = render_text(
        ReportHeader {
            region: Region::Eu,
            cutoff_percent: dec!(5),
        },
        &found,
    );
    assert!(text.starts_with(
        "In region eu with 5 percent margin\n1 arbitrage opportunities found\n"
    ));
    assert!(text.contains("on Draw with Pinnacle for 3.70"));

    let json = render_json(&found).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(1));
}

/// Test that the sports catalog can be fetched.
#[tokio::test]
#[ignore = "requires API_KEY"]
async fn test_list_sports() {
    let config = match live_config() {
        Some(c) => c,
        None => {
            println!("Skipping: API_KEY not set");
            return;
        }
    };

    let client = OddsApiClient::new(&config).unwrap();
    let sports = client.list_sports().await;
    assert!(sports.is_ok(), "Failed to list sports: {:?}", sports.err());

    println!("Found {} sports", sports.unwrap().len());
}

/// Test that a bad key is reported as an authentication error.
#[tokio::test]
#[ignore = "hits the real API"]
async fn test_invalid_key_is_authentication_error() {
    let config = Config {
        api_key: Some("definitely-not-a-key".to_string()),
        ..Config::default()
    };

    let client = OddsApiClient::new(&config).unwrap();
    let err = client.list_sports().await.unwrap_err();

    assert!(matches!(err, ApiError::Authentication { status: 401, .. }), "got {err:?}");
}

/// Test a full scan against the real API.
#[tokio::test]
#[ignore = "requires API_KEY"]
async fn test_live_scan() {
    let config = match live_config() {
        Some(c) => c,
        None => {
            println!("Skipping: API_KEY not set");
            return;
        }
    };

    let client = OddsApiClient::new(&config).unwrap();
    let found = scan(&client, &params(&["soccer_epl"])).await;
    assert!(found.is_ok(), "Scan failed: {:?}", found.err());

    for opp in found.unwrap() {
        assert!(opp.total_implied_odds < dec!(0.95));
        println!("{} {}", opp.match_name, opp.total_implied_odds);
    }
}
