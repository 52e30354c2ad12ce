//! Screens the production sources of an energy mix by their correlation with
//! the carbon intensity, then regresses the intensity on the selected ones.
//!
//! Run with `RUST_LOG=debug cargo run --example energy_mix` to see the
//! estimator logs.

use linearmodel::datasets::DenseDataset;
use linearmodel::estimators::{ols::OrdinaryLeastSquares, traits::Fit};
use linearmodel::statistics::{correlation_matrix, summary, table, Column, Table};
use linearmodel::Result;

fn energy_mix() -> Result<Table<f64>> {
    // Half-hourly production in MW and carbon intensity in gCO2/kWh.
    Table::new()
        .with_column(
            "Consommation",
            Column::numeric([
                53210., 51840., 49920., 48760., 50110., 55430., 61240., 64870., 66120., 63980.,
                60450., 58730.,
            ]),
        )?
        .with_column(
            "Nucleaire",
            Column::numeric([
                41200., 41150., 40980., 40870., 40910., 41020., 41300., 41450., 41500., 41380.,
                41260., 41190.,
            ]),
        )?
        .with_column(
            "Gaz",
            Column::Numeric(vec![
                Some(3120.),
                Some(2890.),
                Some(2510.),
                Some(2280.),
                Some(2640.),
                Some(3870.),
                Some(5120.),
                None,
                Some(6480.),
                Some(5910.),
                Some(4860.),
                Some(4230.),
            ]),
        )?
        .with_column(
            "Charbon",
            Column::numeric([
                410., 380., 350., 330., 360., 520., 780., 940., 1010., 890., 690., 580.,
            ]),
        )?
        .with_column(
            "Taux de Co2",
            Column::numeric([
                38., 36., 33., 31., 34., 45., 58., 66., 70., 64., 55., 49.,
            ]),
        )?
        .with_column(
            "Saison",
            Column::categorical([
                "hiver", "hiver", "hiver", "hiver", "hiver", "hiver", "ete", "ete", "ete", "ete",
                "ete", "ete",
            ]),
        )
}

fn main() -> Result<()> {
    env_logger::init();

    let data = energy_mix()?;
    println!("{}", summary(&data)?);

    let corr = correlation_matrix(&data)?;
    let selected = corr.correlated_with("Taux de Co2", 0.55)?;
    println!("Correlations with the carbon intensity above 0.55:");
    for (name, r) in &selected {
        println!("  {:<15} {:.3}", name, r);
    }

    // Only complete columns can enter the design matrix.
    let features: Vec<&str> = selected
        .iter()
        .map(|(name, _)| name.as_str())
        .filter(|name| data.column(name).map_or(false, |c| c.n_missing() == 0))
        .collect();
    let x = data.design_matrix(&features)?;
    let y = data.targets("Taux de Co2")?;

    let model = OrdinaryLeastSquares::params()
        .verbose(true)
        .fit(&DenseDataset::from((x.clone(), y.clone())))?;
    let report = model.report(&x, &y)?.with_feature_names(features.as_slice())?;
    println!("\n{}", report);

    let seasons: Vec<String> = match data.column("Saison") {
        Some(Column::Categorical(values)) => values.iter().flatten().cloned().collect(),
        _ => Vec::new(),
    };
    let high_carbon: Vec<bool> = y.iter().map(|&v| v > 50.).collect();
    println!("\nSeason versus carbon intensity above 50 g/kWh:");
    println!("{}", table(&seasons, &high_carbon)?);

    Ok(())
}
