//! Table metadata mirrored from the platform migrations.
//!
//! Natural keys and foreign keys here must agree with the `UNIQUE` and
//! `REFERENCES` clauses in `crates/bidesh/migrations`.

use std::fmt;

/// Every table the seeder writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Countries,
    Currencies,
    Degrees,
    Languages,
    LanguageTests,
    Cities,
    Roles,
    Users,
    UserProfiles,
    Wallets,
    WalletTransactions,
    AgencyTypes,
    InstitutionTypes,
    RelationshipTypes,
    SkillCategories,
    Skills,
    Settings,
    EmailTemplates,
    Menus,
    SeoSettings,
    Ads,
    BlogCategories,
    BlogTags,
    BlogPosts,
    BlogPostTags,
    VisaTypes,
    VisaApplications,
    TouristVisas,
    ServiceApplications,
    Agencies,
    Universities,
    Courses,
    RequiredDocuments,
    Translations,
    SupportTickets,
}

impl Table {
    pub const ALL: [Table; 35] = [
        Table::Countries,
        Table::Currencies,
        Table::Degrees,
        Table::Languages,
        Table::LanguageTests,
        Table::Cities,
        Table::Roles,
        Table::Users,
        Table::UserProfiles,
        Table::Wallets,
        Table::WalletTransactions,
        Table::AgencyTypes,
        Table::InstitutionTypes,
        Table::RelationshipTypes,
        Table::SkillCategories,
        Table::Skills,
        Table::Settings,
        Table::EmailTemplates,
        Table::Menus,
        Table::SeoSettings,
        Table::Ads,
        Table::BlogCategories,
        Table::BlogTags,
        Table::BlogPosts,
        Table::BlogPostTags,
        Table::VisaTypes,
        Table::VisaApplications,
        Table::TouristVisas,
        Table::ServiceApplications,
        Table::Agencies,
        Table::Universities,
        Table::Courses,
        Table::RequiredDocuments,
        Table::Translations,
        Table::SupportTickets,
    ];

    /// Returns the database table name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Countries => "countries",
            Table::Currencies => "currencies",
            Table::Degrees => "degrees",
            Table::Languages => "languages",
            Table::LanguageTests => "language_tests",
            Table::Cities => "cities",
            Table::Roles => "roles",
            Table::Users => "users",
            Table::UserProfiles => "user_profiles",
            Table::Wallets => "wallets",
            Table::WalletTransactions => "wallet_transactions",
            Table::AgencyTypes => "agency_types",
            Table::InstitutionTypes => "institution_types",
            Table::RelationshipTypes => "relationship_types",
            Table::SkillCategories => "skill_categories",
            Table::Skills => "skills",
            Table::Settings => "settings",
            Table::EmailTemplates => "email_templates",
            Table::Menus => "menus",
            Table::SeoSettings => "seo_settings",
            Table::Ads => "ads",
            Table::BlogCategories => "blog_categories",
            Table::BlogTags => "blog_tags",
            Table::BlogPosts => "blog_posts",
            Table::BlogPostTags => "blog_post_tags",
            Table::VisaTypes => "visa_types",
            Table::VisaApplications => "visa_applications",
            Table::TouristVisas => "tourist_visas",
            Table::ServiceApplications => "service_applications",
            Table::Agencies => "agencies",
            Table::Universities => "universities",
            Table::Courses => "courses",
            Table::RequiredDocuments => "required_documents",
            Table::Translations => "translations",
            Table::SupportTickets => "support_tickets",
        }
    }

    /// Columns that identify a row independently of its surrogate id.
    pub fn natural_key(&self) -> &'static [&'static str] {
        match self {
            Table::Countries => &["iso2"],
            Table::Currencies => &["code"],
            Table::Languages => &["code"],
            Table::LanguageTests => &["code"],
            Table::Cities => &["country_id", "name"],
            Table::Users => &["email"],
            Table::UserProfiles | Table::Wallets => &["user_id"],
            Table::WalletTransactions | Table::VisaApplications | Table::ServiceApplications => {
                &["reference"]
            }
            Table::Settings => &["key"],
            Table::SeoSettings => &["page_key"],
            Table::BlogPostTags => &["post_id", "tag_id"],
            Table::VisaTypes | Table::RequiredDocuments => &["country_id", "slug"],
            Table::TouristVisas => &["country_id"],
            Table::Agencies => &["license_number"],
            Table::Courses => &["university_id", "slug"],
            Table::Translations => &["locale", "group_name", "key"],
            Table::SupportTickets => &["ticket_number"],
            Table::Degrees
            | Table::Roles
            | Table::AgencyTypes
            | Table::InstitutionTypes
            | Table::RelationshipTypes
            | Table::SkillCategories
            | Table::Skills
            | Table::EmailTemplates
            | Table::Menus
            | Table::Ads
            | Table::BlogCategories
            | Table::BlogTags
            | Table::BlogPosts
            | Table::Universities => &["slug"],
        }
    }

    /// Foreign-key columns and the table each one references.
    pub fn foreign_keys(&self) -> &'static [(&'static str, Table)] {
        match self {
            Table::LanguageTests => &[("language_id", Table::Languages)],
            Table::Cities => &[("country_id", Table::Countries)],
            Table::Users => &[("role_id", Table::Roles)],
            Table::UserProfiles => &[
                ("user_id", Table::Users),
                ("nationality_id", Table::Countries),
            ],
            Table::Wallets => &[("user_id", Table::Users)],
            Table::WalletTransactions => &[("wallet_id", Table::Wallets)],
            Table::Skills => &[("category_id", Table::SkillCategories)],
            Table::Menus => &[("parent_id", Table::Menus)],
            Table::BlogPosts => &[
                ("category_id", Table::BlogCategories),
                ("author_id", Table::Users),
            ],
            Table::BlogPostTags => &[("post_id", Table::BlogPosts), ("tag_id", Table::BlogTags)],
            Table::VisaTypes | Table::TouristVisas | Table::RequiredDocuments => {
                &[("country_id", Table::Countries)]
            }
            Table::VisaApplications => &[
                ("user_id", Table::Users),
                ("visa_type_id", Table::VisaTypes),
            ],
            Table::ServiceApplications => &[("user_id", Table::Users)],
            Table::Agencies => &[
                ("user_id", Table::Users),
                ("agency_type_id", Table::AgencyTypes),
                ("country_id", Table::Countries),
            ],
            Table::Universities => &[
                ("country_id", Table::Countries),
                ("institution_type_id", Table::InstitutionTypes),
            ],
            Table::Courses => &[
                ("university_id", Table::Universities),
                ("degree_id", Table::Degrees),
            ],
            Table::Translations => &[("updated_by", Table::Users)],
            Table::SupportTickets => &[("user_id", Table::Users), ("assigned_to", Table::Users)],
            _ => &[],
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_every_table_has_a_natural_key() {
        for table in Table::ALL {
            assert!(
                !table.natural_key().is_empty(),
                "{table} has no natural key"
            );
        }
    }

    #[test]
    fn test_foreign_keys_point_at_known_tables() {
        let names: HashSet<_> = Table::ALL.iter().map(Table::as_str).collect();
        for table in Table::ALL {
            for (column, parent) in table.foreign_keys() {
                assert!(
                    column.ends_with("_id") || *column == "updated_by" || *column == "assigned_to"
                );
                assert!(names.contains(parent.as_str()));
            }
        }
    }

    #[test]
    fn test_display_uses_table_name() {
        assert_eq!(Table::WalletTransactions.to_string(), "wallet_transactions");
    }
}
