//! Pricing actions: on-demand price lookup, spot history, cost estimates.
//!
//! On-demand prices come from the AWS Pricing API, which keys products by
//! human-readable location names rather than region codes.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::aws::{AwsContext, PricingFilter, SpotPriceQuery};
use crate::domains::tools::registry::{ActionEntry, action};

fn default_operating_system() -> String {
    "Linux".to_string()
}

fn default_product_description() -> String {
    "Linux/UNIX".to_string()
}

fn default_hours_per_month() -> i64 {
    730
}

/// Parameters for the on-demand price lookup.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OnDemandPriceParams {
    /// EC2 instance type, e.g. t3.micro.
    pub instance_type: String,

    /// Operating system as the Pricing API names it, e.g. Linux or Windows.
    #[serde(default = "default_operating_system")]
    pub operating_system: String,

    pub region: Option<String>,
}

/// Parameters for the spot price history query.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SpotPriceHistoryParams {
    /// EC2 instance type, e.g. t3.large.
    pub instance_type: String,

    /// Product description, e.g. Linux/UNIX or Windows.
    #[serde(default = "default_product_description")]
    pub product_description: String,

    /// Start of the query window, RFC 3339 (e.g. 2024-01-01T00:00:00Z).
    pub start_time: Option<String>,

    /// End of the query window, RFC 3339.
    pub end_time: Option<String>,

    /// Restrict to one availability zone.
    pub availability_zone: Option<String>,

    pub region: Option<String>,
}

/// Parameters for the monthly cost estimate.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CostEstimateParams {
    /// EC2 instance type, e.g. t3.micro.
    pub instance_type: String,

    /// Operating system as the Pricing API names it.
    #[serde(default = "default_operating_system")]
    pub operating_system: String,

    /// Billable hours per month. Defaults to 730.
    #[serde(default = "default_hours_per_month")]
    pub hours_per_month: i64,

    pub region: Option<String>,
}

/// Region code to Pricing API location name.
fn pricing_location(region: &str) -> Option<&'static str> {
    match region {
        "us-east-1" => Some("US East (N. Virginia)"),
        "us-east-2" => Some("US East (Ohio)"),
        "us-west-1" => Some("US West (N. California)"),
        "us-west-2" => Some("US West (Oregon)"),
        "af-south-1" => Some("Africa (Cape Town)"),
        "ap-east-1" => Some("Asia Pacific (Hong Kong)"),
        "ap-south-1" => Some("Asia Pacific (Mumbai)"),
        "ap-south-2" => Some("Asia Pacific (Hyderabad)"),
        "ap-southeast-1" => Some("Asia Pacific (Singapore)"),
        "ap-southeast-2" => Some("Asia Pacific (Sydney)"),
        "ap-southeast-3" => Some("Asia Pacific (Jakarta)"),
        "ap-southeast-4" => Some("Asia Pacific (Melbourne)"),
        "ap-northeast-1" => Some("Asia Pacific (Tokyo)"),
        "ap-northeast-2" => Some("Asia Pacific (Seoul)"),
        "ap-northeast-3" => Some("Asia Pacific (Osaka)"),
        "ca-central-1" => Some("Canada (Central)"),
        "ca-west-1" => Some("Canada West (Calgary)"),
        "eu-central-1" => Some("EU (Frankfurt)"),
        "eu-central-2" => Some("EU (Zurich)"),
        "eu-west-1" => Some("EU (Ireland)"),
        "eu-west-2" => Some("EU (London)"),
        "eu-west-3" => Some("EU (Paris)"),
        "eu-north-1" => Some("EU (Stockholm)"),
        "eu-south-1" => Some("EU (Milan)"),
        "eu-south-2" => Some("EU (Spain)"),
        "me-south-1" => Some("Middle East (Bahrain)"),
        "me-central-1" => Some("Middle East (UAE)"),
        "sa-east-1" => Some("South America (São Paulo)"),
        "us-gov-east-1" => Some("AWS GovCloud (US-East)"),
        "us-gov-west-1" => Some("AWS GovCloud (US-West)"),
        _ => None,
    }
}

/// Dig the hourly USD rate out of a price-list document.
fn hourly_usd(product: &Value) -> Option<f64> {
    let on_demand = product.get("terms")?.get("OnDemand")?.as_object()?;
    let term = on_demand.values().next()?;
    let dimensions = term.get("priceDimensions")?.as_object()?;
    let dimension = dimensions.values().next()?;
    dimension
        .get("pricePerUnit")?
        .get("USD")?
        .as_str()?
        .parse()
        .ok()
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

async fn get_ondemand_price(ctx: Arc<AwsContext>, params: OnDemandPriceParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    let Some(location) = pricing_location(&region) else {
        return json!({ "error": format!("Region {region} not supported for pricing API") });
    };

    let filters = vec![
        PricingFilter::term("instanceType", &params.instance_type),
        PricingFilter::term("location", location),
        PricingFilter::term("operatingSystem", &params.operating_system),
        PricingFilter::term("preInstalledSw", "NA"),
        PricingFilter::term("capacitystatus", "Used"),
    ];

    let products = match ctx.pricing.get_products("AmazonEC2", &filters).await {
        Ok(products) => products,
        Err(e) => return json!({ "error": e.to_string() }),
    };

    let Some(product) = products.first() else {
        return json!({ "error": "No pricing data available" });
    };

    let Some(price_per_hour) = hourly_usd(product) else {
        return json!({ "error": "No pricing data available" });
    };

    json!({
        "instance_type": params.instance_type,
        "operating_system": params.operating_system,
        "region": region,
        "price_per_hour_usd": price_per_hour,
        "price_per_month_usd": round_cents(price_per_hour * 720.0),
    })
}

async fn get_spot_price_history(ctx: Arc<AwsContext>, params: SpotPriceHistoryParams) -> Value {
    let region = ctx.region(params.region.as_deref()).to_string();

    let query = SpotPriceQuery {
        instance_type: params.instance_type.clone(),
        product_description: params.product_description,
        start_time: params.start_time,
        end_time: params.end_time,
        availability_zone: params.availability_zone,
    };

    match ctx.ec2.describe_spot_price_history(&region, query).await {
        Ok(history) => json!({
            "instance_type": params.instance_type,
            "region": region,
            "history_count": history.len(),
            "history": history,
        }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}

async fn estimate_instance_cost(ctx: Arc<AwsContext>, params: CostEstimateParams) -> Value {
    let price_info = get_ondemand_price(
        ctx,
        OnDemandPriceParams {
            instance_type: params.instance_type.clone(),
            operating_system: params.operating_system,
            region: params.region,
        },
    )
    .await;

    if price_info.get("error").is_some() {
        return price_info;
    }

    let hourly = price_info
        .get("price_per_hour_usd")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    let monthly = hourly * params.hours_per_month as f64;

    json!({
        "instance_type": params.instance_type,
        "hours_per_month": params.hours_per_month,
        "price_per_hour_usd": hourly,
        "estimated_cost_usd": round_cents(monthly),
    })
}

pub(crate) fn actions() -> Vec<ActionEntry> {
    vec![
        action(
            "get_ondemand_price",
            "Look up the hourly and monthly on-demand price for an instance type",
            get_ondemand_price,
        ),
        action(
            "get_spot_price_history",
            "Fetch spot price history for an instance type",
            get_spot_price_history,
        ),
        action(
            "estimate_instance_cost",
            "Estimate monthly cost from on-demand pricing",
            estimate_instance_cost,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::aws::stub::StubAws;
    use crate::domains::tools::definitions::ec2;

    fn args(value: serde_json::Value) -> rmcp::model::JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_pricing_location_map() {
        assert_eq!(pricing_location("us-east-1"), Some("US East (N. Virginia)"));
        assert_eq!(pricing_location("ap-south-1"), Some("Asia Pacific (Mumbai)"));
        assert_eq!(pricing_location("moon-base-1"), None);
    }

    #[tokio::test]
    async fn test_get_ondemand_price() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "get_ondemand_price",
                args(json!({ "instance_type": "t3.micro" })),
            )
            .await;

        assert_eq!(result["price_per_hour_usd"], 0.0104);
        assert_eq!(result["price_per_month_usd"], 7.49);
        assert_eq!(stub.calls(), vec!["get_products".to_string()]);
    }

    #[tokio::test]
    async fn test_get_ondemand_price_unknown_region() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "get_ondemand_price",
                args(json!({ "instance_type": "t3.micro", "region": "moon-base-1" })),
            )
            .await;

        assert_eq!(
            result["error"],
            "Region moon-base-1 not supported for pricing API"
        );
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_estimate_instance_cost_uses_hours() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "estimate_instance_cost",
                args(json!({ "instance_type": "t3.micro", "hours_per_month": 100 })),
            )
            .await;

        assert_eq!(result["hours_per_month"], 100);
        assert_eq!(result["estimated_cost_usd"], 1.04);
    }

    #[tokio::test]
    async fn test_spot_price_history_shape() {
        let stub = StubAws::new("running");
        let registry = ec2::registry();

        let result = registry
            .dispatch(
                stub.context("us-east-1"),
                "get_spot_price_history",
                args(json!({ "instance_type": "t3.large" })),
            )
            .await;

        assert_eq!(result["history_count"], 1);
        assert_eq!(result["history"][0]["spot_price"], "0.0031");
    }

    #[test]
    fn test_hourly_usd_traversal() {
        let product = json!({
            "terms": { "OnDemand": { "X": { "priceDimensions": { "Y": {
                "pricePerUnit": { "USD": "1.5" }
            }}}}}
        });
        assert_eq!(hourly_usd(&product), Some(1.5));
        assert_eq!(hourly_usd(&json!({})), None);
    }
}
