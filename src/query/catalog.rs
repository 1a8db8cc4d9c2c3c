//! The rule catalog: ordered resolution rules for answers and charts.
//!
//! Catalog order is part of the contract. More specific rules (multi-phrase,
//! filtered) precede the general ones that would also match their query
//! text, so widening happens only after the narrow interpretations fail.

use serde::{Deserialize, Serialize};

use super::types::{Aggregation, OutputTemplate, Reduce, RowFilter, TextPredicate, TextTemplate};

/// A single resolution rule: text predicate, required columns, aggregation
/// specification, and output template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRule {
    /// Stable identifier used in logs and tests.
    pub name: String,
    /// Substring conjunction over the lower-cased query.
    pub text: TextPredicate,
    /// Columns that must exist for the rule to match.
    pub required_columns: Vec<String>,
    /// Columns to normalize into dates before execution.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub temporal_columns: Vec<String>,
    /// The operation to run when the rule matches.
    pub aggregation: Aggregation,
    /// How the result is rendered.
    pub output: OutputTemplate,
}

/// An ordered list of rules evaluated first-match-wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCatalog {
    rules: Vec<QueryRule>,
}

impl RuleCatalog {
    pub fn new(rules: Vec<QueryRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[QueryRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The built-in catalog for text answers.
    pub fn answers() -> Self {
        Self::new(vec![
            QueryRule {
                name: "total_revenue_by_region".into(),
                text: TextPredicate::phrases(&["total revenue by region"]),
                required_columns: cols(&["Region", "Revenue"]),
                temporal_columns: vec![],
                aggregation: Aggregation::GroupReduce {
                    group: "Region".into(),
                    target: "Revenue".into(),
                    stat: Reduce::Sum,
                },
                output: OutputTemplate::Text(TextTemplate::Listing),
            },
            QueryRule {
                name: "top_regions_by_sales".into(),
                text: TextPredicate::phrases(&["top 2 regions", "sales"]),
                required_columns: cols(&["Region", "Revenue"]),
                temporal_columns: vec![],
                aggregation: Aggregation::TopGroups {
                    group: "Region".into(),
                    target: "Revenue".into(),
                    stat: Reduce::Sum,
                    limit: 2,
                },
                output: OutputTemplate::Text(TextTemplate::Listing),
            },
            QueryRule {
                name: "highest_total_units_sold".into(),
                text: TextPredicate::phrases(&["highest total units sold"]),
                required_columns: cols(&["Product", "Units Sold"]),
                temporal_columns: vec![],
                aggregation: Aggregation::GroupExtremum {
                    filters: vec![],
                    group: "Product".into(),
                    target: "Units Sold".into(),
                    stat: Reduce::Sum,
                },
                output: OutputTemplate::Text(TextTemplate::LeaderWithListing {
                    label: "has the highest total units sold".into(),
                }),
            },
            QueryRule {
                name: "widget_a_north_average_price".into(),
                text: TextPredicate::phrases(&["average unit price of widget a", "north"]),
                required_columns: cols(&["Product", "Region", "Unit Price"]),
                temporal_columns: vec![],
                aggregation: Aggregation::FilterReduce {
                    filters: vec![
                        RowFilter::Equals {
                            column: "Product".into(),
                            value: "Widget A".into(),
                        },
                        RowFilter::Equals {
                            column: "Region".into(),
                            value: "North".into(),
                        },
                    ],
                    target: "Unit Price".into(),
                    stat: Reduce::Mean,
                },
                output: OutputTemplate::Text(TextTemplate::Sentence {
                    label: "Average unit price of Widget A in North".into(),
                    decimals: Some(2),
                }),
            },
            QueryRule {
                name: "widget_a_east_units".into(),
                text: TextPredicate::phrases(&["widget a", "east", "units"]),
                required_columns: cols(&["Product", "Region", "Units Sold"]),
                temporal_columns: vec![],
                aggregation: Aggregation::FilterReduce {
                    filters: vec![
                        RowFilter::Equals {
                            column: "Product".into(),
                            value: "Widget A".into(),
                        },
                        RowFilter::Equals {
                            column: "Region".into(),
                            value: "East".into(),
                        },
                    ],
                    target: "Units Sold".into(),
                    stat: Reduce::Sum,
                },
                output: OutputTemplate::Text(TextTemplate::Sentence {
                    label: "Units of Widget A sold in East".into(),
                    decimals: None,
                }),
            },
            QueryRule {
                name: "widget_c_top_region".into(),
                text: TextPredicate::phrases(&["widget c", "region", "highest"]),
                required_columns: cols(&["Product", "Region", "Units Sold"]),
                temporal_columns: vec![],
                aggregation: Aggregation::GroupExtremum {
                    filters: vec![RowFilter::Equals {
                        column: "Product".into(),
                        value: "Widget C".into(),
                    }],
                    group: "Region".into(),
                    target: "Units Sold".into(),
                    stat: Reduce::Sum,
                },
                output: OutputTemplate::Text(TextTemplate::LeaderWithListing {
                    label: "had the highest Widget C sales".into(),
                }),
            },
            QueryRule {
                name: "widget_b_january_revenue".into(),
                text: TextPredicate::phrases(&["widget b", "total revenue", "january"]),
                required_columns: cols(&["Product", "Date", "Revenue"]),
                temporal_columns: cols(&["Date"]),
                aggregation: Aggregation::FilterReduce {
                    filters: vec![
                        RowFilter::Equals {
                            column: "Product".into(),
                            value: "Widget B".into(),
                        },
                        RowFilter::Month {
                            column: "Date".into(),
                            month: 1,
                        },
                    ],
                    target: "Revenue".into(),
                    stat: Reduce::Sum,
                },
                output: OutputTemplate::Text(TextTemplate::Sentence {
                    label: "Total revenue for Widget B in January".into(),
                    decimals: None,
                }),
            },
            QueryRule {
                name: "january_total_revenue".into(),
                text: TextPredicate::phrases(&["total revenue", "january"]),
                required_columns: cols(&["Date", "Revenue"]),
                temporal_columns: cols(&["Date"]),
                aggregation: Aggregation::FilterReduce {
                    filters: vec![RowFilter::Month {
                        column: "Date".into(),
                        month: 1,
                    }],
                    target: "Revenue".into(),
                    stat: Reduce::Sum,
                },
                output: OutputTemplate::Text(TextTemplate::Sentence {
                    label: "Total revenue for all products in January".into(),
                    decimals: None,
                }),
            },
            QueryRule {
                name: "widget_a_top_region".into(),
                text: TextPredicate::phrases(&["widget a", "region", "sold the most"]),
                required_columns: cols(&["Product", "Region", "Units Sold"]),
                temporal_columns: vec![],
                aggregation: Aggregation::GroupExtremum {
                    filters: vec![RowFilter::Equals {
                        column: "Product".into(),
                        value: "Widget A".into(),
                    }],
                    group: "Region".into(),
                    target: "Units Sold".into(),
                    stat: Reduce::Sum,
                },
                output: OutputTemplate::Text(TextTemplate::LeaderWithListing {
                    label: "sold the most Widget A units".into(),
                }),
            },
            QueryRule {
                name: "widget_b_january_price_leader".into(),
                text: TextPredicate::phrases(&["widget b", "average unit price", "january"]),
                required_columns: cols(&["Product", "Region", "Unit Price", "Date"]),
                temporal_columns: cols(&["Date"]),
                aggregation: Aggregation::GroupExtremum {
                    filters: vec![
                        RowFilter::Equals {
                            column: "Product".into(),
                            value: "Widget B".into(),
                        },
                        RowFilter::Month {
                            column: "Date".into(),
                            month: 1,
                        },
                    ],
                    group: "Region".into(),
                    target: "Unit Price".into(),
                    stat: Reduce::Mean,
                },
                output: OutputTemplate::Text(TextTemplate::LeaderWithListing {
                    label: "had the highest average unit price for Widget B".into(),
                }),
            },
        ])
    }

    /// The built-in catalog for chart requests.
    pub fn charts() -> Self {
        Self::new(vec![
            QueryRule {
                name: "revenue_by_region_chart".into(),
                text: TextPredicate::phrases(&["revenue", "region"]),
                required_columns: cols(&["Region", "Revenue"]),
                temporal_columns: vec![],
                aggregation: Aggregation::GroupReduce {
                    group: "Region".into(),
                    target: "Revenue".into(),
                    stat: Reduce::Sum,
                },
                output: OutputTemplate::Chart {
                    title: "Revenue by Region".into(),
                    x_label: "Region".into(),
                },
            },
            QueryRule {
                name: "product_distribution_chart".into(),
                text: TextPredicate::phrases(&["product distribution"]),
                required_columns: cols(&["Product"]),
                temporal_columns: vec![],
                aggregation: Aggregation::CountValues {
                    column: "Product".into(),
                },
                output: OutputTemplate::Chart {
                    title: "Product Distribution".into(),
                    x_label: "Product".into(),
                },
            },
            QueryRule {
                name: "units_by_product_chart".into(),
                text: TextPredicate::phrases(&["units sold", "product"]),
                required_columns: cols(&["Product", "Units Sold"]),
                temporal_columns: vec![],
                aggregation: Aggregation::GroupReduce {
                    group: "Product".into(),
                    target: "Units Sold".into(),
                    stat: Reduce::Sum,
                },
                output: OutputTemplate::Chart {
                    title: "Units Sold by Product".into(),
                    x_label: "Product".into(),
                },
            },
            QueryRule {
                name: "revenue_over_time_chart".into(),
                text: TextPredicate::phrases(&["revenue over time"]),
                required_columns: cols(&["Date", "Revenue"]),
                temporal_columns: cols(&["Date"]),
                aggregation: Aggregation::GroupReduce {
                    group: "Date".into(),
                    target: "Revenue".into(),
                    stat: Reduce::Sum,
                },
                output: OutputTemplate::Chart {
                    title: "Revenue Over Time".into(),
                    x_label: "Date".into(),
                },
            },
            QueryRule {
                name: "units_over_time_chart".into(),
                text: TextPredicate::phrases(&["units sold over time"]),
                required_columns: cols(&["Date", "Units Sold"]),
                temporal_columns: cols(&["Date"]),
                aggregation: Aggregation::GroupReduce {
                    group: "Date".into(),
                    target: "Units Sold".into(),
                    stat: Reduce::Sum,
                },
                output: OutputTemplate::Chart {
                    title: "Units Sold Over Time".into(),
                    x_label: "Date".into(),
                },
            },
        ])
    }
}

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
