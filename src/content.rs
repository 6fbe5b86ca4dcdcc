//! Injected site content
//!
//! Read-only data the effects render: navigation, projects, personal info,
//! hero taglines and boot lines. Built-in defaults can be replaced by a JSON
//! document embedded in the page.

use serde::{Deserialize, Serialize};

use crate::choreo::GeoPoint;
use crate::error::ContentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    /// Section id the item scrolls to and highlights for
    pub target: String,
}

impl NavItem {
    fn new(label: &str, target: &str) -> Self {
        Self {
            label: label.to_string(),
            target: target.to_string(),
        }
    }

    /// Anchor href for the target section
    pub fn href(&self) -> String {
        format!("#{}", self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub location: String,
    /// Base point of the hero coordinates readout
    pub origin: GeoPoint,
    pub email: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteContent {
    pub nav: Vec<NavItem>,
    pub projects: Vec<Project>,
    pub personal: PersonalInfo,
    pub taglines: Vec<String>,
    pub boot_lines: Vec<String>,
}

/// Element id of the embedded JSON document
pub const CONTENT_ELEMENT_ID: &str = "site-content";

impl SiteContent {
    /// Parse and validate a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let content: Self = serde_json::from_str(json)?;
        content.validate()?;
        Ok(content)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        if self.nav.is_empty() {
            return Err(ContentError::Empty("nav"));
        }
        if self.taglines.is_empty() {
            return Err(ContentError::Empty("taglines"));
        }
        if self.boot_lines.is_empty() {
            return Err(ContentError::Empty("boot_lines"));
        }
        for (i, item) in self.nav.iter().enumerate() {
            if self.nav[..i].iter().any(|prev| prev.target == item.target) {
                return Err(ContentError::DuplicateTarget(item.target.clone()));
            }
        }
        Ok(())
    }

    /// Section ids in navigation order
    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.nav.iter().map(|n| n.target.as_str())
    }
}

#[allow(clippy::too_many_arguments)]
fn project(
    id: &str,
    title: &str,
    category: &str,
    description: &str,
    image_url: &str,
    tags: &[&str],
    link: &str,
    repository: Option<&str>,
) -> Project {
    Project {
        id: id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        image_url: image_url.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        link: link.to_string(),
        repository: repository.map(str::to_string),
    }
}

impl Default for PersonalInfo {
    fn default() -> Self {
        Self {
            name: "Caner Coşkun".to_string(),
            title: "Full-Stack Developer & Software Engineering Student".to_string(),
            location: "Ankara, Turkey".to_string(),
            origin: GeoPoint {
                lat: 39.9334,
                lon: 32.8597,
            },
            email: "ccoskun742@gmail.com".to_string(),
            available: false,
        }
    }
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            nav: vec![
                NavItem::new("HOME", "hero"),
                NavItem::new("ABOUT", "about"),
                NavItem::new("WORK", "projects"),
                NavItem::new("CONTACT", "contact"),
            ],
            projects: vec![
                project(
                    "project-01",
                    "BELSISNET REPORTING PLATFORM",
                    "ENTERPRISE",
                    "Enterprise municipal reporting system serving 200+ municipalities across Turkey, with role-based authorization, dynamic report management and cached report generation.",
                    "https://images.unsplash.com/photo-1460925895917-afdab827c52f?q=80&w=1600&auto=format&fit=crop",
                    &["ASP.NET Core", "DevExpress", "Entity Framework", "SQL Server", "RBAC"],
                    "https://belsis.com.tr",
                    None,
                ),
                project(
                    "project-02",
                    "NEWSPAPER PORTFOLIO",
                    "WEB_DEV",
                    "Vintage newspaper-themed portfolio website with 1880s newspaper aesthetics on a modern web stack.",
                    "https://raw.githubusercontent.com/jedkx/Jedkx-NewsPaper-Portfolio/main/src/assets/developer-daily-preview.png",
                    &["React 19", "TypeScript", "Vite", "CSS3"],
                    "https://jedkx.github.io/Jedkx-NewsPaper-Portfolio/",
                    Some("https://github.com/jedkx/Jedkx-NewsPaper-Portfolio"),
                ),
                project(
                    "project-03",
                    "PWNAGOTCHI",
                    "HARDWARE",
                    "WiFi security research device on a Raspberry Pi Zero W using reinforcement learning, with a custom OLED interface.",
                    "https://miro.medium.com/v2/resize:fit:720/format:webp/0*ZyM9WnUwk-sXjjha",
                    &["Raspberry Pi", "Python", "Machine Learning", "Cybersecurity", "IoT"],
                    "https://medium.com/@ccoskun742/pwnagotchi-setup-a-practical-guide-and-my-advanced-usage-notes-0c698bc07b28",
                    Some("https://github.com/jedkx"),
                ),
                project(
                    "project-04",
                    "CI/CD FULL-STACK CALCULATOR",
                    "ENTERPRISE",
                    "Full-stack calculator with an automated test and deployment pipeline on GitLab, .NET 8 backend and React frontend.",
                    "https://delta.blue/img/blog/gitlab-ci-cd.png",
                    &["CI/CD Pipeline", ".NET 8", "React", "GitLab", "Automated Testing"],
                    "https://gitlab.com/me2815443/my-project",
                    Some("https://gitlab.com/me2815443/my-project"),
                ),
                project(
                    "project-05",
                    "FORG [IN PROGRESS]",
                    "GAME_DEV",
                    "Top-down survival game in Godot 4 with pixel art assets, automatic weapons and enemy AI.",
                    "https://images.unsplash.com/photo-1550745165-9bc0b252726f?q=80&w=1600&auto=format&fit=crop",
                    &["Godot 4.x", "GDScript", "Aseprite", "Game Dev", "OOP"],
                    "https://github.com/jedkx/forg",
                    Some("https://github.com/jedkx/forg"),
                ),
                project(
                    "project-06",
                    "VIDEO PORTFOLIO",
                    "CREATIVE",
                    "Portfolio of six years of professional video editing work with interactive galleries.",
                    "https://images.unsplash.com/photo-1574717024653-61fd2cf4d44d?q=80&w=1600&auto=format&fit=crop",
                    &["React", "CSS3", "Video Production", "Animation"],
                    "https://jedkx.github.io/Jedkx-Video-Editor-Portfolio/",
                    Some("https://github.com/jedkx/Jedkx-Video-Editor-Portfolio"),
                ),
            ],
            personal: PersonalInfo::default(),
            taglines: [
                "Full-Stack Developer at Belsis",
                "Software Engineering Student at Atılım",
                "Video Editor with 6+ Years Experience",
                "Cybersecurity & Ethical Hacking Enthusiast",
            ]
            .map(String::from)
            .to_vec(),
            boot_lines: [
                "> INITIALIZING VOID PROTOCOL...",
                "> ESTABLISHING NEURAL LINK...",
                "> LOADING SYSTEM CORE...",
                "> CALIBRATING SENSORS...",
                "> SYSTEM READY.",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let c = SiteContent::default();
        c.validate().unwrap();
        assert_eq!(c.projects.len(), 6);
        assert_eq!(c.boot_lines.len(), 5);
        assert_eq!(
            c.section_ids().collect::<Vec<_>>(),
            ["hero", "about", "projects", "contact"]
        );
        assert_eq!(c.nav[2].href(), "#projects");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c = SiteContent::from_json(r#"{"taglines": ["Rustacean"]}"#).unwrap();
        assert_eq!(c.taglines, vec!["Rustacean".to_string()]);
        assert_eq!(c.nav.len(), 4);
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(matches!(
            SiteContent::from_json("{nope"),
            Err(ContentError::Json(_))
        ));
        assert!(matches!(
            SiteContent::from_json(r#"{"boot_lines": []}"#),
            Err(ContentError::Empty("boot_lines"))
        ));
        let dup = r##"{"nav": [{"label": "A", "target": "x"}, {"label": "B", "target": "x"}]}"##;
        assert!(matches!(
            SiteContent::from_json(dup),
            Err(ContentError::DuplicateTarget(t)) if t == "x"
        ));
    }
}
