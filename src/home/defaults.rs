//! Bundled default home page documents
//!
//! Used at cold start, when the backend has nothing published, and on reset.

use super::page::{HomePageConfig, Mode};
use super::section::*;

fn cta(text: &str, link: &str) -> CallToAction {
    CallToAction {
        text: text.to_string(),
        link: link.to_string(),
    }
}

fn heading(badge: Option<&str>, title: &str, subtitle: &str) -> SectionHeading {
    SectionHeading {
        badge: badge.map(str::to_string),
        title: title.to_string(),
        subtitle: subtitle.to_string(),
    }
}

fn section(id: &str, order: u32, body: SectionBody) -> SectionConfig {
    SectionConfig {
        id: id.to_string(),
        enabled: true,
        order,
        body,
    }
}

fn treatment(id: &str, title: &str, description: &str, icon: &str) -> TreatmentCard {
    TreatmentCard {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        image: None,
        link: format!("/treatments/{id}"),
    }
}

fn step(n: u32, title: &str, description: &str, icon: &str) -> HowItWorksStep {
    HowItWorksStep {
        id: format!("step-{n}"),
        step: n,
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
    }
}

fn feature(id: &str, title: &str, description: &str, icon: &str) -> FeatureItem {
    FeatureItem {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
    }
}

fn testimonial(id: &str, name: &str, country: &str, treatment: &str, quote: &str) -> TestimonialItem {
    TestimonialItem {
        id: id.to_string(),
        name: name.to_string(),
        country: country.to_string(),
        treatment: treatment.to_string(),
        quote: quote.to_string(),
        rating: 5,
        image: None,
    }
}

fn how_it_works() -> SectionBody {
    SectionBody::HowItWorks {
        content: heading(Some("Simple process"), "How It Works", "From first inquiry to recovery in four steps"),
        steps: vec![
            step(1, "Share your needs", "Tell us about your condition and upload reports", "file-text"),
            step(2, "Get a treatment plan", "Receive quotes from accredited hospitals within 48 hours", "clipboard"),
            step(3, "Plan your trip", "We help with visa letters, travel and stay", "plane"),
            step(4, "Recover with support", "A coordinator stays with you until you fly home", "heart"),
        ],
    }
}

fn why_pondicherry(subtitle: &str) -> SectionBody {
    SectionBody::WhyPondicherry {
        content: WhyPondicherryContent {
            badge: Some("Why Pondicherry".to_string()),
            title: "Heal by the Bay of Bengal".to_string(),
            subtitle: subtitle.to_string(),
            image: Some("/images/pondicherry-promenade.jpg".to_string()),
        },
        features: vec![
            feature("quality", "Accredited care", "NABH and JCI accredited hospitals", "shield-check"),
            feature("cost", "Lower costs", "Save up to 70% compared to Western prices", "piggy-bank"),
            feature("calm", "Calm surroundings", "A quiet coastal town made for recovery", "sun"),
        ],
    }
}

fn medical() -> HomePageConfig {
    let sections = vec![
        section(
            "hero",
            1,
            SectionBody::Hero {
                content: HeroContent {
                    badge: "Trusted medical travel partner".to_string(),
                    title: Headline {
                        line1: "World-Class Healthcare".to_string(),
                        line2: "in Pondicherry".to_string(),
                        highlight: Some("Pondicherry".to_string()),
                    },
                    subtitle: "Accredited hospitals, experienced doctors and end-to-end support at a fraction of the cost"
                        .to_string(),
                    primary_cta: cta("Get a Free Quote", "/inquiry"),
                    secondary_cta: Some(cta("Browse Hospitals", "/hospitals")),
                    background_image: "/images/hero-medical.jpg".to_string(),
                    stats: vec![
                        HeroStat { value: "50+".to_string(), label: "Partner hospitals".to_string() },
                        HeroStat { value: "10k+".to_string(), label: "Patients treated".to_string() },
                    ],
                },
            },
        ),
        section(
            "treatments",
            2,
            SectionBody::Treatments {
                content: heading(Some("Specialties"), "Popular Treatments", "Care across every major specialty"),
                items: vec![
                    treatment("cardiology", "Cardiology", "Bypass surgery, angioplasty and valve repair", "heart-pulse"),
                    treatment("orthopedics", "Orthopedics", "Joint replacement and spine surgery", "bone"),
                    treatment("oncology", "Oncology", "Chemotherapy, radiation and surgical oncology", "ribbon"),
                    treatment("ivf", "Fertility & IVF", "Assisted reproduction with high success rates", "baby"),
                ],
            },
        ),
        section(
            "hospitals",
            3,
            SectionBody::Hospitals {
                content: HospitalsContent {
                    badge: Some("Partners".to_string()),
                    title: "Featured Hospitals".to_string(),
                    subtitle: "Hand-picked, accredited and patient-reviewed".to_string(),
                    view_all_cta: Some(cta("View all hospitals", "/hospitals")),
                },
                items: Vec::new(),
            },
        ),
        section("how-it-works", 4, how_it_works()),
        section(
            "testimonials",
            5,
            SectionBody::Testimonials {
                content: heading(Some("Stories"), "What Our Patients Say", "Real experiences from international patients"),
                items: vec![
                    testimonial(
                        "t1",
                        "Sarah M.",
                        "United Kingdom",
                        "Knee replacement",
                        "Walking without pain three weeks after surgery. The team handled everything.",
                    ),
                    testimonial(
                        "t2",
                        "Ahmed K.",
                        "Oman",
                        "Cardiac bypass",
                        "Excellent surgeons and a coordinator who answered every question.",
                    ),
                ],
            },
        ),
        section("why-pondicherry", 6, why_pondicherry("Quality care, lower costs and a peaceful place to recover")),
        section(
            "cta",
            7,
            SectionBody::Cta {
                content: CtaContent {
                    title: "Ready to start your treatment journey?".to_string(),
                    subtitle: "Send us your reports and get a personalised plan".to_string(),
                    primary_cta: cta("Get a Free Quote", "/inquiry"),
                    secondary_cta: Some(cta("Talk to us", "/contact")),
                    background_image: None,
                },
            },
        ),
    ];
    HomePageConfig::new(Mode::Medical, sections)
}

fn wellness() -> HomePageConfig {
    let sections = vec![
        section(
            "hero",
            1,
            SectionBody::Hero {
                content: HeroContent {
                    badge: "Ayurveda, yoga and holistic healing".to_string(),
                    title: Headline {
                        line1: "Restore Body and Mind".to_string(),
                        line2: "in Pondicherry".to_string(),
                        highlight: Some("Body and Mind".to_string()),
                    },
                    subtitle: "Authentic wellness retreats guided by certified practitioners".to_string(),
                    primary_cta: cta("Explore Packages", "/packages"),
                    secondary_cta: None,
                    background_image: "/images/hero-wellness.jpg".to_string(),
                    stats: Vec::new(),
                },
            },
        ),
        section(
            "treatments",
            2,
            SectionBody::Treatments {
                content: heading(Some("Therapies"), "Wellness Programs", "Traditional therapies for lasting balance"),
                items: vec![
                    treatment("ayurveda", "Ayurveda", "Panchakarma and personalised detox programs", "leaf"),
                    treatment("yoga", "Yoga Retreats", "Daily practice with experienced teachers", "flower"),
                    treatment("naturopathy", "Naturopathy", "Drug-free healing through diet and lifestyle", "sprout"),
                ],
            },
        ),
        section("how-it-works", 3, how_it_works()),
        section(
            "testimonials",
            4,
            SectionBody::Testimonials {
                content: heading(None, "Guest Experiences", "Stories from our wellness guests"),
                items: vec![testimonial(
                    "w1",
                    "Lena B.",
                    "Germany",
                    "Panchakarma",
                    "Two weeks that changed how I sleep, eat and breathe.",
                )],
            },
        ),
        section("why-pondicherry", 5, why_pondicherry("A spiritual coastal town with a long tradition of healing")),
        section(
            "cta",
            6,
            SectionBody::Cta {
                content: CtaContent {
                    title: "Begin your wellness retreat".to_string(),
                    subtitle: "Tell us what you are looking for and we will suggest a program".to_string(),
                    primary_cta: cta("Plan my retreat", "/inquiry?mode=wellness"),
                    secondary_cta: None,
                    background_image: Some("/images/cta-wellness.jpg".to_string()),
                },
            },
        ),
    ];
    HomePageConfig::new(Mode::Wellness, sections)
}

/// Fresh copy of the bundled document for `mode`
pub fn default_config(mode: Mode) -> HomePageConfig {
    match mode {
        Mode::Medical => medical(),
        Mode::Wellness => wellness(),
    }
}
