//! Site navigation as explicit state.
//!
//! The client holds a [`NavState`] and sends it back with each [`Action`];
//! [`apply`] and [`view`] are pure, so no navigation state lives on the server.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Demo account accepted by the login page
pub const DEMO_USERNAME: &str = "admin";
pub const DEMO_PASSWORD: &str = "password";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Home,
    Login,
    Signup,
    /// Soil image prediction
    Main,
    GpsRecommendation,
    MarketDemand,
    About,
    Projects,
    Contact,
}

impl Page {
    /// Pages in sidebar order
    pub fn all() -> &'static [Page] {
        &[
            Page::Home,
            Page::Login,
            Page::Signup,
            Page::Main,
            Page::GpsRecommendation,
            Page::MarketDemand,
            Page::Contact,
            Page::Projects,
            Page::About,
        ]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Login => "login",
            Page::Signup => "signup",
            Page::Main => "main",
            Page::GpsRecommendation => "gps_recommendation",
            Page::MarketDemand => "market_demand",
            Page::About => "about",
            Page::Projects => "projects",
            Page::Contact => "contact",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Yuvaa Farming",
            Page::Login => "User Login",
            Page::Signup => "User Signup",
            Page::Main => "Main Application",
            Page::GpsRecommendation => "GPS-based Fertilizer Recommendation",
            Page::MarketDemand => "Demand in Market",
            Page::About => "About Us",
            Page::Projects => "Projects",
            Page::Contact => "Contact Us",
        }
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::all()
            .iter()
            .find(|p| p.slug() == s)
            .copied()
            .ok_or_else(|| format!("unknown page: {}", s))
    }
}

/// Per-visitor navigation state, owned by the client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavState {
    pub page: Page,
    #[serde(default)]
    pub logged_in: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Navigate {
        page: Page,
    },
    Login {
        username: String,
        password: String,
    },
    Signup {
        username: String,
        password: String,
        confirm_password: String,
    },
}

/// New state plus the message to show the user, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub state: NavState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Compute the next navigation state
pub fn apply(state: &NavState, action: &Action) -> Transition {
    match action {
        Action::Navigate { page } => Transition {
            state: NavState {
                page: *page,
                ..state.clone()
            },
            message: None,
        },
        Action::Login { username, password } => {
            if username == DEMO_USERNAME && password == DEMO_PASSWORD {
                Transition {
                    state: NavState {
                        page: Page::Main,
                        logged_in: true,
                    },
                    message: Some("Logged in successfully!"),
                }
            } else {
                Transition {
                    state: state.clone(),
                    message: Some("Invalid username or password."),
                }
            }
        }
        Action::Signup {
            password,
            confirm_password,
            ..
        } => {
            if password == confirm_password {
                Transition {
                    state: NavState {
                        page: Page::Login,
                        ..state.clone()
                    },
                    message: Some("Signup successful!"),
                }
            } else {
                Transition {
                    state: state.clone(),
                    message: Some("Passwords do not match."),
                }
            }
        }
    }
}

/// Static content of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub page: Page,
    pub title: &'static str,
    pub body: &'static [&'static str],
    /// Pages reachable by a button on this page
    pub links: &'static [Page],
    /// Form fields the page collects
    pub fields: &'static [&'static str],
}

/// Render a page
pub fn view(page: Page) -> View {
    let (body, links, fields) = match page {
        Page::Home => content(
            &[
                "Welcome to our Youth Farming website!",
                "Please login, sign up, or use the GPS-based fertilizer recommendation to get started.",
            ],
            &[Page::Login, Page::Signup, Page::GpsRecommendation],
            &[],
        ),
        Page::Login => content(&[], &[], &["username", "password"]),
        Page::Signup => content(&[], &[], &["username", "password", "confirm_password"]),
        Page::Main => content(
            &[
                "Upload an image for prediction",
                "Select the month for sowing your crop:",
            ],
            &[],
            &["image", "month"],
        ),
        Page::GpsRecommendation => content(&[], &[], &["location", "latitude", "longitude"]),
        Page::MarketDemand => content(
            &["Select the month to see the market demand and recommended fertilizers:"],
            &[],
            &["month"],
        ),
        Page::About => content(
            &[
                "We are passionate about revolutionizing farming practices using technology.",
                "Our mission is to empower farmers and promote sustainable agriculture.",
            ],
            &[],
            &[],
        ),
        Page::Projects => content(
            &[
                "Explore our latest projects and initiatives in the field of agriculture technology.",
                "From soil health monitoring to crop prediction, we're working on innovative solutions to address farming challenges.",
            ],
            &[],
            &[],
        ),
        Page::Contact => content(
            &[
                "Have questions or feedback? Reach out to us!",
                "Email: contact@yuvaa-farming.com",
                "Phone: 123-456-7890",
                "Address: 123 Farming Street, Agriculture City, Country",
            ],
            &[],
            &[],
        ),
    };

    View {
        page,
        title: page.title(),
        body,
        links,
        fields,
    }
}

type Content = (&'static [&'static str], &'static [Page], &'static [&'static str]);

fn content(
    body: &'static [&'static str],
    links: &'static [Page],
    fields: &'static [&'static str],
) -> Content {
    (body, links, fields)
}
