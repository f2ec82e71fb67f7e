// src/views.rs
use minijinja::{context, Environment};

use crate::models::profile::Profile;

pub const LOGIN_ERROR_MESSAGE: &str = "كلمة المرور غير صحيحة";
pub const UPDATE_SUCCESS_MESSAGE: &str = "تم تحديث البيانات بنجاح!";

const TEMPLATES: &[(&str, &str)] = &[
    ("index.html", include_str!("../templates/index.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
];

/// HTML pages, compiled once from the templates embedded in the binary.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn index(&self, profile: &Profile) -> Result<String, minijinja::Error> {
        self.env.get_template("index.html")?.render(profile)
    }

    pub fn login(&self, error: Option<&str>) -> Result<String, minijinja::Error> {
        self.env
            .get_template("login.html")?
            .render(context! { error => error })
    }

    pub fn dashboard(
        &self,
        profile: &Profile,
        message: Option<&str>,
    ) -> Result<String, minijinja::Error> {
        self.env
            .get_template("dashboard.html")?
            .render(context! { data => profile, message => message })
    }
}
