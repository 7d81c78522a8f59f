//! Blog categories, tags and posts.

use async_trait::async_trait;
use rand::Rng;

use bidesh::models::PostStatus;

use super::{Loader, SeedContext};
use crate::db::{LoadReport, Row, SeedError, Table};
use crate::generators::demo::days_ago;

/// (slug, name, description)
#[rustfmt::skip]
const CATEGORIES: &[(&str, &str, &str)] = &[
    ("visa-guides", "Visa Guides", "Step-by-step visa application walkthroughs"),
    ("study-abroad", "Study Abroad", "Admissions, scholarships and student visas"),
    ("overseas-jobs", "Overseas Jobs", "Working abroad safely and legally"),
    ("travel-tips", "Travel Tips", "Air travel, transit and arrival advice"),
    ("news", "News & Updates", "Policy changes affecting Bangladeshi travellers"),
];

const TAGS: &[(&str, &str)] = &[
    ("ielts", "IELTS"),
    ("schengen", "Schengen"),
    ("saudi-arabia", "Saudi Arabia"),
    ("malaysia", "Malaysia"),
    ("canada", "Canada"),
    ("japan", "Japan"),
    ("scholarship", "Scholarship"),
    ("bmet", "BMET"),
    ("documents", "Documents"),
    ("umrah", "Umrah"),
];

/// Blog categories and tags.
pub struct BlogTaxonomyLoader;

#[async_trait]
impl Loader for BlogTaxonomyLoader {
    fn name(&self) -> &'static str {
        "blog_taxonomy"
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::BlogCategories, Table::BlogTags]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let categories: Vec<Row> = CATEGORIES
            .iter()
            .map(|&(slug, name, description)| {
                Row::new(Table::BlogCategories)
                    .set("slug", slug)
                    .set("name", name)
                    .set("description", description)
            })
            .collect();
        let mut tags = Vec::with_capacity(TAGS.len());
        for &(slug, name) in TAGS {
            tags.push(
                Row::new(Table::BlogTags)
                    .set("slug", slug)
                    .set("name", name),
            );
        }

        let mut report = ctx.seeder.seed_rows("blog categories", &categories).await?;
        report += ctx.seeder.seed_rows("blog tags", &tags).await?;
        Ok(report)
    }
}

struct PostSeed {
    slug: &'static str,
    title: &'static str,
    excerpt: &'static str,
    body: &'static str,
    category: &'static str,
    author_email: &'static str,
    status: PostStatus,
    tags: &'static [&'static str],
}

#[rustfmt::skip]
const POSTS: &[PostSeed] = &[
    PostSeed {
        slug: "schengen-visa-checklist-for-bangladeshis",
        title: "Schengen Visa Checklist for Bangladeshi Applicants",
        excerpt: "Every document the embassies ask for, and the mistakes that get files returned.",
        body: "Applying for a Schengen visa from Dhaka starts with booking an appointment at the \
               VFS centre of the country where you will spend the most nights.\n\n\
               Bring six months of bank statements, an NOC from your employer, travel insurance \
               covering EUR 30,000 and confirmed hotel bookings. Tax returns for the last two \
               years carry a lot of weight with most consulates.",
        category: "visa-guides",
        author_email: "admin@bgplatform.com",
        status: PostStatus::Published,
        tags: &["schengen", "documents"],
    },
    PostSeed {
        slug: "ielts-band-requirements-2024",
        title: "IELTS Band Requirements by Country",
        excerpt: "What score you need for the UK, Canada and Australia, and how long it stays valid.",
        body: "Most undergraduate programmes in the UK ask for an overall band of 6.0 with no \
               component below 5.5. Canadian study permits through SDS need 6.0 in each band.\n\n\
               Results are valid for two years from the test date, so plan your intake before \
               booking the exam.",
        category: "study-abroad",
        author_email: "consultant@bgplatform.com",
        status: PostStatus::Published,
        tags: &["ielts", "canada", "scholarship"],
    },
    PostSeed {
        slug: "working-in-saudi-arabia-what-to-know",
        title: "Working in Saudi Arabia: What to Know Before You Fly",
        excerpt: "Iqama, medical tests and the BMET smart card explained.",
        body: "Every worker leaving Bangladesh for employment needs a BMET smart card, issued \
               after registration, a pre-departure briefing and a GAMCA medical test.\n\n\
               On arrival your employer applies for an iqama. Never hand over your passport \
               permanently; keep copies of your contract in Bangla and Arabic.",
        category: "overseas-jobs",
        author_email: "admin@bgplatform.com",
        status: PostStatus::Published,
        tags: &["saudi-arabia", "bmet"],
    },
    PostSeed {
        slug: "japan-language-school-route",
        title: "The Language School Route to Japan",
        excerpt: "How two years of Japanese study can lead to university or a work visa.",
        body: "Japanese language schools sponsor student visas for applicants with JLPT N5 or \
               150 hours of study. Intakes are in April and October.\n\n\
               Students may work 28 hours a week, and graduates who pass N2 are eligible for \
               specified skilled worker visas.",
        category: "study-abroad",
        author_email: "consultant@bgplatform.com",
        status: PostStatus::Published,
        tags: &["japan"],
    },
    PostSeed {
        slug: "umrah-2025-package-guide",
        title: "Umrah 2025: Choosing a Package",
        excerpt: "What is included at each price point and how to verify the agency.",
        body: "Only agencies licensed by the Ministry of Religious Affairs may sell Umrah \
               packages. Ask for the licence number and check it on the ministry portal.",
        category: "travel-tips",
        author_email: "admin@bgplatform.com",
        status: PostStatus::Draft,
        tags: &["umrah", "saudi-arabia"],
    },
];

/// Posts, linked to their author by email and to tags through the pivot.
pub struct BlogPostsLoader;

#[async_trait]
impl Loader for BlogPostsLoader {
    fn name(&self) -> &'static str {
        "blog_posts"
    }

    fn requires(&self) -> &'static [Table] {
        &[Table::BlogCategories, Table::BlogTags, Table::Users]
    }

    fn provides(&self) -> &'static [Table] {
        &[Table::BlogPosts, Table::BlogPostTags]
    }

    async fn load(&self, ctx: &mut SeedContext<'_>) -> Result<LoadReport, SeedError> {
        let seeder = ctx.seeder;
        let now = ctx.now;
        let mut report = LoadReport::default();

        for post in POSTS {
            let category_id = seeder
                .require_id(self.name(), Table::BlogCategories, "slug", post.category)
                .await?;
            let author_id = seeder
                .require_id(self.name(), Table::Users, "email", post.author_email)
                .await?;
            let (Some(category_id), Some(author_id)) = (category_id, author_id) else {
                report.skip();
                continue;
            };

            let rng = ctx.rng();
            let (published_at, views) = match post.status {
                PostStatus::Published => (
                    Some(days_ago(now, 3, 180, rng)),
                    rng.gen_range(150..12_000_i64),
                ),
                PostStatus::Draft => (None, 0),
            };
            // ~200 words a minute
            let words = post.body.split_whitespace().count() as i64;

            let row = Row::new(Table::BlogPosts)
                .set("slug", post.slug)
                .set("title", post.title)
                .set("excerpt", post.excerpt)
                .set("body", post.body)
                .set("category_id", category_id)
                .set("author_id", author_id)
                .set("status", post.status.as_str())
                .set("published_at", published_at)
                .set("views", views)
                .set("reading_minutes", (words / 200).max(1));
            let post_id = seeder.upsert(&row).await?;
            report.record(post_id);

            for tag in post.tags {
                let Some(tag_id) = seeder
                    .require_id(self.name(), Table::BlogTags, "slug", tag)
                    .await?
                else {
                    report.skip();
                    continue;
                };
                let pivot = Row::new(Table::BlogPostTags)
                    .set("post_id", post_id.id)
                    .set("tag_id", tag_id)
                    .keep_existing();
                report.record(seeder.upsert(&pivot).await?);
            }
        }

        Ok(report)
    }
}
