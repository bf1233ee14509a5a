//! Database service for sales-service.
//!
//! Every save of a derived-field record (document lines, invoices) goes
//! through a recompute step here; callers never persist totals, tax or
//! remaining-balance values directly.

use crate::models::{
    check_type_fields, compute_remaining, compute_tax, merge_type_identifiers, totals,
    BillingStatus, Client, Company,
    CreateClient, CreateCompany, CreateDeliveryLine, CreateDeliveryNote, CreateInvoice,
    CreateMonthlyTarget, CreateOrderLine, CreatePurchaseOrder, CreateQuote, CreateQuoteLine,
    CreateSite, DeliveryLine, DeliveryNote, Invoice, MonthlyTarget, OrderLine, Profile, ProfileRow,
    PurchaseOrder, Quote, QuoteLine, Role, Site, UpdateClient, UpdateCompany, UpdateDeliveryLine,
    UpdateDeliveryNote, UpdateInvoice, UpdateOrderLine, UpdatePurchaseOrder, UpdateQuote,
    UpdateQuoteLine, UpdateSite,
};
use crate::services::access::SiteScope;
use crate::services::guard::{dependents_of, probe_sql, EntityKind};
use crate::services::metrics::DB_QUERY_DURATION;
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

const COMPANY_COLUMNS: &str = "company_id, name, phone, address_line1, address_line2, city, \
     patente, trade_registry, cnss_number, fiscal_id, ice_number, bank_rib, legal_form, \
     registered_capital, email, business_sector, active, deleted, created_utc, updated_utc";

const SITE_COLUMNS: &str = "site_id, company_id, name, invoice_name, phone, address_line1, \
     address_line2, city, patente, reference_code, bank_rib, region, active, deleted, \
     created_utc, updated_utc";

const CLIENT_COLUMNS: &str = "client_id, name, email, phone, client_type, active, deleted, \
     site_id, user_id, enterprise_name, siret, vat_number, created_utc";

const INVOICE_COLUMNS: &str = "invoice_id, purchase_order_id, client_id, invoice_number, \
     invoice_date, total, tax_amount, discount_amount, payment_status, payment_mode, due_date, \
     paid_utc, payment_terms, delivery_address, shipping_status, partial_payment, \
     remaining_balance, billing_status";

fn ensure_positive_quantity(quantity: i32) -> Result<(), AppError> {
    if quantity < 1 {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Quantity must be a positive integer, got {}",
            quantity
        )));
    }
    Ok(())
}

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "sales-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Company Operations
    // -------------------------------------------------------------------------

    /// Create a new company.
    #[instrument(skip(self, input))]
    pub async fn create_company(&self, input: &CreateCompany) -> Result<Company, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_company"])
            .start_timer();

        let company_id = Uuid::new_v4();
        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            INSERT INTO companies (
                company_id, name, phone, address_line1, address_line2, city, patente,
                trade_registry, cnss_number, fiscal_id, ice_number, bank_rib, legal_form,
                registered_capital, email, business_sector
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {COMPANY_COLUMNS}
            "#,
        ))
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.address_line1)
        .bind(&input.address_line2)
        .bind(&input.city)
        .bind(&input.patente)
        .bind(&input.trade_registry)
        .bind(&input.cnss_number)
        .bind(&input.fiscal_id)
        .bind(&input.ice_number)
        .bind(&input.bank_rib)
        .bind(input.legal_form.map(|f| f.as_str()))
        .bind(input.registered_capital)
        .bind(&input.email)
        .bind(&input.business_sector)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create company: {}", e)))?;

        timer.observe_duration();

        info!(company_id = %company.company_id, name = %company.name, "Company created");

        Ok(company)
    }

    /// Get a company by ID.
    #[instrument(skip(self), fields(company_id = %company_id))]
    pub async fn get_company(&self, company_id: Uuid) -> Result<Option<Company>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_company"])
            .start_timer();

        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE company_id = $1 AND deleted = FALSE",
        ))
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get company: {}", e)))?;

        timer.observe_duration();

        Ok(company)
    }

    /// List non-deleted companies, ordered by name.
    #[instrument(skip(self))]
    pub async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_companies"])
            .start_timer();

        let companies = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE deleted = FALSE ORDER BY name",
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list companies: {}", e)))?;

        timer.observe_duration();

        Ok(companies)
    }

    /// Update a company.
    #[instrument(skip(self, input), fields(company_id = %company_id))]
    pub async fn update_company(
        &self,
        company_id: Uuid,
        input: &UpdateCompany,
    ) -> Result<Option<Company>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_company"])
            .start_timer();

        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE companies
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                address_line1 = COALESCE($4, address_line1),
                address_line2 = COALESCE($5, address_line2),
                city = COALESCE($6, city),
                patente = COALESCE($7, patente),
                trade_registry = COALESCE($8, trade_registry),
                cnss_number = COALESCE($9, cnss_number),
                fiscal_id = COALESCE($10, fiscal_id),
                ice_number = COALESCE($11, ice_number),
                bank_rib = COALESCE($12, bank_rib),
                legal_form = COALESCE($13, legal_form),
                registered_capital = COALESCE($14, registered_capital),
                email = COALESCE($15, email),
                business_sector = COALESCE($16, business_sector),
                active = COALESCE($17, active),
                updated_utc = NOW()
            WHERE company_id = $1 AND deleted = FALSE
            RETURNING {COMPANY_COLUMNS}
            "#,
        ))
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.address_line1)
        .bind(&input.address_line2)
        .bind(&input.city)
        .bind(&input.patente)
        .bind(&input.trade_registry)
        .bind(&input.cnss_number)
        .bind(&input.fiscal_id)
        .bind(&input.ice_number)
        .bind(&input.bank_rib)
        .bind(input.legal_form.map(|f| f.as_str()))
        .bind(input.registered_capital)
        .bind(&input.email)
        .bind(&input.business_sector)
        .bind(input.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update company: {}", e)))?;

        timer.observe_duration();

        Ok(company)
    }

    /// Soft-delete a company after checking for live dependents.
    #[instrument(skip(self), fields(company_id = %company_id))]
    pub async fn soft_delete_company(&self, company_id: Uuid) -> Result<bool, AppError> {
        self.soft_delete(EntityKind::Company, "companies", "company_id", company_id)
            .await
    }

    /// Soft-delete a site after checking for live dependents.
    #[instrument(skip(self), fields(site_id = %site_id))]
    pub async fn soft_delete_site(&self, site_id: Uuid) -> Result<bool, AppError> {
        self.soft_delete(EntityKind::Site, "sites", "site_id", site_id)
            .await
    }

    async fn soft_delete(
        &self,
        kind: EntityKind,
        table: &str,
        id_column: &str,
        id: Uuid,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["soft_delete"])
            .start_timer();

        for rel in dependents_of(kind) {
            if !rel.soft_delete_aware {
                continue;
            }
            let exists: bool = sqlx::query_scalar(&probe_sql(rel))
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to probe dependents in {}: {}",
                        rel.table,
                        e
                    ))
                })?;
            if exists {
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Cannot delete this record: it is still referenced by at least one {}",
                    rel.entity
                )));
            }
        }

        let result = sqlx::query(&format!(
            "UPDATE {table} SET deleted = TRUE, updated_utc = NOW() \
             WHERE {id_column} = $1 AND deleted = FALSE",
        ))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to soft-delete: {}", e)))?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(id = %id, table = table, "Record soft-deleted");
        }

        Ok(deleted)
    }

    // -------------------------------------------------------------------------
    // Site Operations
    // -------------------------------------------------------------------------

    /// Create a new site. The owning company must exist and be active.
    #[instrument(skip(self, input), fields(company_id = %input.company_id))]
    pub async fn create_site(&self, input: &CreateSite) -> Result<Site, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_site"])
            .start_timer();

        let company = self
            .get_company(input.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Company not found")))?;
        if !company.active {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Sites can only be attached to active companies"
            )));
        }

        let site_id = Uuid::new_v4();
        let site = sqlx::query_as::<_, Site>(&format!(
            r#"
            INSERT INTO sites (
                site_id, company_id, name, invoice_name, phone, address_line1, address_line2,
                city, patente, reference_code, bank_rib, region
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {SITE_COLUMNS}
            "#,
        ))
        .bind(site_id)
        .bind(input.company_id)
        .bind(&input.name)
        .bind(&input.invoice_name)
        .bind(&input.phone)
        .bind(&input.address_line1)
        .bind(&input.address_line2)
        .bind(&input.city)
        .bind(&input.patente)
        .bind(&input.reference_code)
        .bind(&input.bank_rib)
        .bind(input.region.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create site: {}", e)))?;

        timer.observe_duration();

        info!(site_id = %site.site_id, name = %site.name, "Site created");

        Ok(site)
    }

    /// Get a site by ID.
    #[instrument(skip(self), fields(site_id = %site_id))]
    pub async fn get_site(&self, site_id: Uuid) -> Result<Option<Site>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_site"])
            .start_timer();

        let site = sqlx::query_as::<_, Site>(&format!(
            "SELECT {SITE_COLUMNS} FROM sites WHERE site_id = $1 AND deleted = FALSE",
        ))
        .bind(site_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get site: {}", e)))?;

        timer.observe_duration();

        Ok(site)
    }

    /// List non-deleted sites, ordered by name.
    #[instrument(skip(self))]
    pub async fn list_sites(&self) -> Result<Vec<Site>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_sites"])
            .start_timer();

        let sites = sqlx::query_as::<_, Site>(&format!(
            "SELECT {SITE_COLUMNS} FROM sites WHERE deleted = FALSE ORDER BY name",
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list sites: {}", e)))?;

        timer.observe_duration();

        Ok(sites)
    }

    /// List the sites visible to an actor's scope.
    #[instrument(skip(self, scope))]
    pub async fn visible_sites(&self, scope: &SiteScope) -> Result<Vec<Site>, AppError> {
        match scope {
            SiteScope::All => self.list_sites().await,
            SiteScope::Assigned(ids) if ids.is_empty() => Ok(Vec::new()),
            SiteScope::Assigned(ids) => {
                let timer = DB_QUERY_DURATION
                    .with_label_values(&["visible_sites"])
                    .start_timer();

                let sites = sqlx::query_as::<_, Site>(&format!(
                    "SELECT {SITE_COLUMNS} FROM sites \
                     WHERE site_id = ANY($1) AND deleted = FALSE ORDER BY name",
                ))
                .bind(ids)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to list visible sites: {}", e))
                })?;

                timer.observe_duration();

                Ok(sites)
            }
        }
    }

    /// Update a site and append a snapshot to its history side-table.
    #[instrument(skip(self, input), fields(site_id = %site_id))]
    pub async fn update_site(
        &self,
        site_id: Uuid,
        input: &UpdateSite,
    ) -> Result<Option<Site>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_site"])
            .start_timer();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to open tx: {}", e)))?;

        let site = sqlx::query_as::<_, Site>(&format!(
            r#"
            UPDATE sites
            SET name = COALESCE($2, name),
                invoice_name = COALESCE($3, invoice_name),
                phone = COALESCE($4, phone),
                address_line1 = COALESCE($5, address_line1),
                address_line2 = COALESCE($6, address_line2),
                city = COALESCE($7, city),
                patente = COALESCE($8, patente),
                reference_code = COALESCE($9, reference_code),
                bank_rib = COALESCE($10, bank_rib),
                region = COALESCE($11, region),
                active = COALESCE($12, active),
                updated_utc = NOW()
            WHERE site_id = $1 AND deleted = FALSE
            RETURNING {SITE_COLUMNS}
            "#,
        ))
        .bind(site_id)
        .bind(&input.name)
        .bind(&input.invoice_name)
        .bind(&input.phone)
        .bind(&input.address_line1)
        .bind(&input.address_line2)
        .bind(&input.city)
        .bind(&input.patente)
        .bind(&input.reference_code)
        .bind(&input.bank_rib)
        .bind(input.region.map(|r| r.as_str()))
        .bind(input.active)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update site: {}", e)))?;

        if let Some(ref s) = site {
            sqlx::query(
                r#"
                INSERT INTO site_history (
                    history_id, site_id, company_id, name, invoice_name, phone, address_line1,
                    address_line2, city, patente, reference_code, bank_rib, region, active
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(s.site_id)
            .bind(s.company_id)
            .bind(&s.name)
            .bind(&s.invoice_name)
            .bind(&s.phone)
            .bind(&s.address_line1)
            .bind(&s.address_line2)
            .bind(&s.city)
            .bind(&s.patente)
            .bind(&s.reference_code)
            .bind(&s.bank_rib)
            .bind(&s.region)
            .bind(s.active)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to record site history: {}", e))
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to commit tx: {}", e)))?;

        timer.observe_duration();

        Ok(site)
    }

    // -------------------------------------------------------------------------
    // Profile Operations
    // -------------------------------------------------------------------------

    /// Fetch a user's profile with its site assignments resolved.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_profile"])
            .start_timer();

        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT profile_id, user_id, role FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get profile: {}", e)))?;

        let profile = match row {
            Some(row) => {
                let site_ids: Vec<Uuid> = sqlx::query_scalar(
                    "SELECT site_id FROM profile_sites WHERE profile_id = $1",
                )
                .bind(row.profile_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to get profile sites: {}",
                        e
                    ))
                })?;

                Some(Profile {
                    profile_id: row.profile_id,
                    user_id: row.user_id,
                    role: Role::from_string(&row.role),
                    site_ids,
                })
            }
            None => None,
        };

        timer.observe_duration();

        Ok(profile)
    }

    // -------------------------------------------------------------------------
    // Client Operations
    // -------------------------------------------------------------------------

    /// Create a new client. Validation runs before any persistence.
    #[instrument(skip(self, input))]
    pub async fn create_client(&self, input: &CreateClient) -> Result<Client, AppError> {
        use validator::Validate;
        input.validate()?;
        check_type_fields(
            input.client_type,
            input.siret.as_deref(),
            input.vat_number.as_deref(),
        )?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_client"])
            .start_timer();

        let client_id = Uuid::new_v4();
        let client = sqlx::query_as::<_, Client>(&format!(
            r#"
            INSERT INTO clients (
                client_id, name, email, phone, client_type, site_id, user_id,
                enterprise_name, siret, vat_number
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {CLIENT_COLUMNS}
            "#,
        ))
        .bind(client_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.client_type.as_str())
        .bind(input.site_id)
        .bind(input.user_id)
        .bind(&input.enterprise_name)
        .bind(&input.siret)
        .bind(&input.vat_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "A client with email '{}' already exists",
                    input.email
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create client: {}", e)),
        })?;

        timer.observe_duration();

        info!(client_id = %client.client_id, "Client created");

        Ok(client)
    }

    /// Get a client by ID.
    #[instrument(skip(self), fields(client_id = %client_id))]
    pub async fn get_client(&self, client_id: Uuid) -> Result<Option<Client>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_client"])
            .start_timer();

        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE client_id = $1 AND deleted = FALSE",
        ))
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get client: {}", e)))?;

        timer.observe_duration();

        Ok(client)
    }

    /// List non-deleted clients, optionally scoped to one site.
    #[instrument(skip(self))]
    pub async fn list_clients(&self, site_id: Option<Uuid>) -> Result<Vec<Client>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_clients"])
            .start_timer();

        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients \
             WHERE deleted = FALSE AND ($1::uuid IS NULL OR site_id = $1) ORDER BY name",
        ))
        .bind(site_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list clients: {}", e)))?;

        timer.observe_duration();

        Ok(clients)
    }

    /// Update a client. The merged record is re-validated before the write.
    #[instrument(skip(self, input), fields(client_id = %client_id))]
    pub async fn update_client(
        &self,
        client_id: Uuid,
        input: &UpdateClient,
    ) -> Result<Option<Client>, AppError> {
        use validator::Validate;
        input.validate()?;

        let Some(existing) = self.get_client(client_id).await? else {
            return Ok(None);
        };

        let client_type = input
            .client_type
            .unwrap_or_else(|| crate::models::ClientType::from_string(&existing.client_type));
        let (siret, vat_number) = merge_type_identifiers(
            client_type,
            input.siret.as_deref(),
            input.vat_number.as_deref(),
            existing.siret.as_deref(),
            existing.vat_number.as_deref(),
        );
        check_type_fields(client_type, siret.as_deref(), vat_number.as_deref())?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_client"])
            .start_timer();

        let client = sqlx::query_as::<_, Client>(&format!(
            r#"
            UPDATE clients
            SET name = $2,
                email = $3,
                phone = $4,
                client_type = $5,
                active = $6,
                site_id = $7,
                user_id = $8,
                enterprise_name = $9,
                siret = $10,
                vat_number = $11
            WHERE client_id = $1 AND deleted = FALSE
            RETURNING {CLIENT_COLUMNS}
            "#,
        ))
        .bind(client_id)
        .bind(input.name.as_ref().unwrap_or(&existing.name))
        .bind(input.email.as_ref().unwrap_or(&existing.email))
        .bind(input.phone.clone().or(existing.phone))
        .bind(client_type.as_str())
        .bind(input.active.unwrap_or(existing.active))
        .bind(input.site_id.or(existing.site_id))
        .bind(input.user_id.or(existing.user_id))
        .bind(input.enterprise_name.clone().or(existing.enterprise_name))
        .bind(&siret)
        .bind(&vat_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("A client with this email already exists"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to update client: {}", e)),
        })?;

        timer.observe_duration();

        Ok(client)
    }

    /// Soft-delete a client. Clients guard nothing downstream; documents
    /// keep their references.
    #[instrument(skip(self), fields(client_id = %client_id))]
    pub async fn soft_delete_client(&self, client_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["soft_delete_client"])
            .start_timer();

        let result =
            sqlx::query("UPDATE clients SET deleted = TRUE WHERE client_id = $1 AND deleted = FALSE")
                .bind(client_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to soft-delete client: {}", e))
                })?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(client_id = %client_id, "Client soft-deleted");
        }

        Ok(deleted)
    }

    // -------------------------------------------------------------------------
    // Quote Operations
    // -------------------------------------------------------------------------

    /// Create a new quote.
    #[instrument(skip(self, input), fields(client_id = %input.client_id))]
    pub async fn create_quote(&self, input: &CreateQuote) -> Result<Quote, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_quote"])
            .start_timer();

        let quote_id = Uuid::new_v4();
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (quote_id, client_id, expires_utc, status, total, discount_pct, tax_pct)
            VALUES ($1, $2, $3, 'pending', $4, $5, $6)
            RETURNING quote_id, client_id, created_utc, expires_utc, status, total, discount_pct, tax_pct
            "#,
        )
        .bind(quote_id)
        .bind(input.client_id)
        .bind(input.expires_utc)
        .bind(input.total)
        .bind(input.discount_pct)
        .bind(input.tax_pct)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create quote: {}", e)))?;

        timer.observe_duration();

        info!(quote_id = %quote.quote_id, "Quote created");

        Ok(quote)
    }

    /// Get a quote by ID.
    #[instrument(skip(self), fields(quote_id = %quote_id))]
    pub async fn get_quote(&self, quote_id: Uuid) -> Result<Option<Quote>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_quote"])
            .start_timer();

        let quote = sqlx::query_as::<_, Quote>(
            "SELECT quote_id, client_id, created_utc, expires_utc, status, total, discount_pct, tax_pct \
             FROM quotes WHERE quote_id = $1",
        )
        .bind(quote_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get quote: {}", e)))?;

        timer.observe_duration();

        Ok(quote)
    }

    /// List quotes, optionally for one client.
    #[instrument(skip(self))]
    pub async fn list_quotes(&self, client_id: Option<Uuid>) -> Result<Vec<Quote>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_quotes"])
            .start_timer();

        let quotes = sqlx::query_as::<_, Quote>(
            "SELECT quote_id, client_id, created_utc, expires_utc, status, total, discount_pct, tax_pct \
             FROM quotes WHERE ($1::uuid IS NULL OR client_id = $1) ORDER BY created_utc DESC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list quotes: {}", e)))?;

        timer.observe_duration();

        Ok(quotes)
    }

    /// Update a quote header.
    #[instrument(skip(self, input), fields(quote_id = %quote_id))]
    pub async fn update_quote(
        &self,
        quote_id: Uuid,
        input: &UpdateQuote,
    ) -> Result<Option<Quote>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_quote"])
            .start_timer();

        let quote = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET expires_utc = COALESCE($2, expires_utc),
                status = COALESCE($3, status),
                total = COALESCE($4, total),
                discount_pct = COALESCE($5, discount_pct),
                tax_pct = COALESCE($6, tax_pct)
            WHERE quote_id = $1
            RETURNING quote_id, client_id, created_utc, expires_utc, status, total, discount_pct, tax_pct
            "#,
        )
        .bind(quote_id)
        .bind(input.expires_utc)
        .bind(input.status.map(|s| s.as_str()))
        .bind(input.total)
        .bind(input.discount_pct)
        .bind(input.tax_pct)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update quote: {}", e)))?;

        timer.observe_duration();

        Ok(quote)
    }

    /// Add a line to a quote. The line total is computed here, never taken
    /// from the caller.
    #[instrument(skip(self, input), fields(quote_id = %quote_id))]
    pub async fn add_quote_line(
        &self,
        quote_id: Uuid,
        input: &CreateQuoteLine,
    ) -> Result<QuoteLine, AppError> {
        ensure_positive_quantity(input.quantity)?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["add_quote_line"])
            .start_timer();

        self.get_quote(quote_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Quote not found")))?;

        let line_total =
            totals::discounted_line_total(input.quantity, input.unit_price, input.discount_pct);

        let quote_line_id = Uuid::new_v4();
        let line = sqlx::query_as::<_, QuoteLine>(
            r#"
            INSERT INTO quote_lines (
                quote_line_id, quote_id, product_id, site_article_id, quantity,
                unit_price, discount_pct, line_total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING quote_line_id, quote_id, product_id, site_article_id, quantity,
                unit_price, discount_pct, line_total, created_utc
            "#,
        )
        .bind(quote_line_id)
        .bind(quote_id)
        .bind(input.product_id)
        .bind(input.site_article_id)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(input.discount_pct)
        .bind(line_total)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to add quote line: {}", e)))?;

        timer.observe_duration();

        info!(quote_line_id = %line.quote_line_id, "Quote line added");

        Ok(line)
    }

    /// Get the lines of a quote.
    #[instrument(skip(self), fields(quote_id = %quote_id))]
    pub async fn get_quote_lines(&self, quote_id: Uuid) -> Result<Vec<QuoteLine>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_quote_lines"])
            .start_timer();

        let lines = sqlx::query_as::<_, QuoteLine>(
            "SELECT quote_line_id, quote_id, product_id, site_article_id, quantity, \
             unit_price, discount_pct, line_total, created_utc \
             FROM quote_lines WHERE quote_id = $1 ORDER BY created_utc",
        )
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get quote lines: {}", e)))?;

        timer.observe_duration();

        Ok(lines)
    }

    /// Update a quote line, recomputing its total from the merged values.
    #[instrument(skip(self, input), fields(quote_line_id = %quote_line_id))]
    pub async fn update_quote_line(
        &self,
        quote_id: Uuid,
        quote_line_id: Uuid,
        input: &UpdateQuoteLine,
    ) -> Result<Option<QuoteLine>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_quote_line"])
            .start_timer();

        let existing = sqlx::query_as::<_, QuoteLine>(
            "SELECT quote_line_id, quote_id, product_id, site_article_id, quantity, \
             unit_price, discount_pct, line_total, created_utc \
             FROM quote_lines WHERE quote_id = $1 AND quote_line_id = $2",
        )
        .bind(quote_id)
        .bind(quote_line_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get quote line: {}", e)))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let quantity = input.quantity.unwrap_or(existing.quantity);
        ensure_positive_quantity(quantity)?;
        let unit_price = input.unit_price.unwrap_or(existing.unit_price);
        let discount_pct = input.discount_pct.unwrap_or(existing.discount_pct);
        let line_total = totals::discounted_line_total(quantity, unit_price, discount_pct);

        let line = sqlx::query_as::<_, QuoteLine>(
            r#"
            UPDATE quote_lines
            SET quantity = $3, unit_price = $4, discount_pct = $5, line_total = $6
            WHERE quote_id = $1 AND quote_line_id = $2
            RETURNING quote_line_id, quote_id, product_id, site_article_id, quantity,
                unit_price, discount_pct, line_total, created_utc
            "#,
        )
        .bind(quote_id)
        .bind(quote_line_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(discount_pct)
        .bind(line_total)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update quote line: {}", e))
        })?;

        timer.observe_duration();

        Ok(line)
    }

    /// Remove a quote line.
    #[instrument(skip(self), fields(quote_line_id = %quote_line_id))]
    pub async fn remove_quote_line(
        &self,
        quote_id: Uuid,
        quote_line_id: Uuid,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["remove_quote_line"])
            .start_timer();

        let result =
            sqlx::query("DELETE FROM quote_lines WHERE quote_id = $1 AND quote_line_id = $2")
                .bind(quote_id)
                .bind(quote_line_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to remove quote line: {}", e))
                })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    /// Informational sum of a quote's line totals. Nothing forces the
    /// quote header total to match it.
    #[instrument(skip(self), fields(quote_id = %quote_id))]
    pub async fn sum_quote_line_totals(&self, quote_id: Uuid) -> Result<Decimal, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["sum_quote_line_totals"])
            .start_timer();

        let sum: Option<Decimal> = sqlx::query_scalar(
            "SELECT COALESCE(SUM(line_total), 0) FROM quote_lines WHERE quote_id = $1",
        )
        .bind(quote_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum quote lines: {}", e)))?;

        timer.observe_duration();

        Ok(sum.unwrap_or(Decimal::ZERO))
    }

    // -------------------------------------------------------------------------
    // Purchase Order Operations
    // -------------------------------------------------------------------------

    /// Create a purchase order from a quote.
    #[instrument(skip(self, input), fields(quote_id = %input.quote_id))]
    pub async fn create_purchase_order(
        &self,
        input: &CreatePurchaseOrder,
    ) -> Result<PurchaseOrder, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_purchase_order"])
            .start_timer();

        self.get_quote(input.quote_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Quote not found")))?;

        let purchase_order_id = Uuid::new_v4();
        let order = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            INSERT INTO purchase_orders (
                purchase_order_id, quote_id, client_id, order_date, status, total,
                payment_mode, delivery_date
            )
            VALUES ($1, $2, $3, COALESCE($4, NOW()), 'pending', $5, $6, $7)
            RETURNING purchase_order_id, quote_id, client_id, order_date, status, total,
                payment_mode, delivery_date
            "#,
        )
        .bind(purchase_order_id)
        .bind(input.quote_id)
        .bind(input.client_id)
        .bind(input.order_date)
        .bind(input.total)
        .bind(&input.payment_mode)
        .bind(input.delivery_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create purchase order: {}", e))
        })?;

        timer.observe_duration();

        info!(purchase_order_id = %order.purchase_order_id, "Purchase order created");

        Ok(order)
    }

    /// Get a purchase order by ID.
    #[instrument(skip(self), fields(purchase_order_id = %purchase_order_id))]
    pub async fn get_purchase_order(
        &self,
        purchase_order_id: Uuid,
    ) -> Result<Option<PurchaseOrder>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_purchase_order"])
            .start_timer();

        let order = sqlx::query_as::<_, PurchaseOrder>(
            "SELECT purchase_order_id, quote_id, client_id, order_date, status, total, \
             payment_mode, delivery_date FROM purchase_orders WHERE purchase_order_id = $1",
        )
        .bind(purchase_order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get purchase order: {}", e))
        })?;

        timer.observe_duration();

        Ok(order)
    }

    /// List purchase orders, optionally for one client.
    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
        client_id: Option<Uuid>,
    ) -> Result<Vec<PurchaseOrder>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_purchase_orders"])
            .start_timer();

        let orders = sqlx::query_as::<_, PurchaseOrder>(
            "SELECT purchase_order_id, quote_id, client_id, order_date, status, total, \
             payment_mode, delivery_date FROM purchase_orders \
             WHERE ($1::uuid IS NULL OR client_id = $1) ORDER BY order_date DESC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list purchase orders: {}", e))
        })?;

        timer.observe_duration();

        Ok(orders)
    }

    /// Update a purchase order header.
    #[instrument(skip(self, input), fields(purchase_order_id = %purchase_order_id))]
    pub async fn update_purchase_order(
        &self,
        purchase_order_id: Uuid,
        input: &UpdatePurchaseOrder,
    ) -> Result<Option<PurchaseOrder>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_purchase_order"])
            .start_timer();

        let order = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            UPDATE purchase_orders
            SET status = COALESCE($2, status),
                total = COALESCE($3, total),
                payment_mode = COALESCE($4, payment_mode),
                delivery_date = COALESCE($5, delivery_date)
            WHERE purchase_order_id = $1
            RETURNING purchase_order_id, quote_id, client_id, order_date, status, total,
                payment_mode, delivery_date
            "#,
        )
        .bind(purchase_order_id)
        .bind(input.status.map(|s| s.as_str()))
        .bind(input.total)
        .bind(&input.payment_mode)
        .bind(input.delivery_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update purchase order: {}", e))
        })?;

        timer.observe_duration();

        Ok(order)
    }

    /// Add a line to a purchase order. Total = quantity x unit price.
    #[instrument(skip(self, input), fields(purchase_order_id = %purchase_order_id))]
    pub async fn add_order_line(
        &self,
        purchase_order_id: Uuid,
        input: &CreateOrderLine,
    ) -> Result<OrderLine, AppError> {
        ensure_positive_quantity(input.quantity)?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["add_order_line"])
            .start_timer();

        self.get_purchase_order(purchase_order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Purchase order not found")))?;

        let line_total = totals::line_total(input.quantity, input.unit_price);

        let order_line_id = Uuid::new_v4();
        let line = sqlx::query_as::<_, OrderLine>(
            r#"
            INSERT INTO order_lines (
                order_line_id, purchase_order_id, product_id, site_article_id,
                quantity, unit_price, line_total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING order_line_id, purchase_order_id, product_id, site_article_id,
                quantity, unit_price, line_total, created_utc
            "#,
        )
        .bind(order_line_id)
        .bind(purchase_order_id)
        .bind(input.product_id)
        .bind(input.site_article_id)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(line_total)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to add order line: {}", e)))?;

        timer.observe_duration();

        info!(order_line_id = %line.order_line_id, "Order line added");

        Ok(line)
    }

    /// Get the lines of a purchase order.
    #[instrument(skip(self), fields(purchase_order_id = %purchase_order_id))]
    pub async fn get_order_lines(
        &self,
        purchase_order_id: Uuid,
    ) -> Result<Vec<OrderLine>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_order_lines"])
            .start_timer();

        let lines = sqlx::query_as::<_, OrderLine>(
            "SELECT order_line_id, purchase_order_id, product_id, site_article_id, quantity, \
             unit_price, line_total, created_utc \
             FROM order_lines WHERE purchase_order_id = $1 ORDER BY created_utc",
        )
        .bind(purchase_order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get order lines: {}", e)))?;

        timer.observe_duration();

        Ok(lines)
    }

    /// Update an order line, recomputing its total.
    #[instrument(skip(self, input), fields(order_line_id = %order_line_id))]
    pub async fn update_order_line(
        &self,
        purchase_order_id: Uuid,
        order_line_id: Uuid,
        input: &UpdateOrderLine,
    ) -> Result<Option<OrderLine>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_order_line"])
            .start_timer();

        let existing = sqlx::query_as::<_, OrderLine>(
            "SELECT order_line_id, purchase_order_id, product_id, site_article_id, quantity, \
             unit_price, line_total, created_utc \
             FROM order_lines WHERE purchase_order_id = $1 AND order_line_id = $2",
        )
        .bind(purchase_order_id)
        .bind(order_line_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get order line: {}", e)))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let quantity = input.quantity.unwrap_or(existing.quantity);
        ensure_positive_quantity(quantity)?;
        let unit_price = input.unit_price.unwrap_or(existing.unit_price);
        let line_total = totals::line_total(quantity, unit_price);

        let line = sqlx::query_as::<_, OrderLine>(
            r#"
            UPDATE order_lines
            SET quantity = $3, unit_price = $4, line_total = $5
            WHERE purchase_order_id = $1 AND order_line_id = $2
            RETURNING order_line_id, purchase_order_id, product_id, site_article_id,
                quantity, unit_price, line_total, created_utc
            "#,
        )
        .bind(purchase_order_id)
        .bind(order_line_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(line_total)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update order line: {}", e))
        })?;

        timer.observe_duration();

        Ok(line)
    }

    /// Remove an order line.
    #[instrument(skip(self), fields(order_line_id = %order_line_id))]
    pub async fn remove_order_line(
        &self,
        purchase_order_id: Uuid,
        order_line_id: Uuid,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["remove_order_line"])
            .start_timer();

        let result = sqlx::query(
            "DELETE FROM order_lines WHERE purchase_order_id = $1 AND order_line_id = $2",
        )
        .bind(purchase_order_id)
        .bind(order_line_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to remove order line: {}", e))
        })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    /// Informational sum of an order's line totals.
    #[instrument(skip(self), fields(purchase_order_id = %purchase_order_id))]
    pub async fn sum_order_line_totals(
        &self,
        purchase_order_id: Uuid,
    ) -> Result<Decimal, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["sum_order_line_totals"])
            .start_timer();

        let sum: Option<Decimal> = sqlx::query_scalar(
            "SELECT COALESCE(SUM(line_total), 0) FROM order_lines WHERE purchase_order_id = $1",
        )
        .bind(purchase_order_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum order lines: {}", e)))?;

        timer.observe_duration();

        Ok(sum.unwrap_or(Decimal::ZERO))
    }

    // -------------------------------------------------------------------------
    // Delivery Note Operations
    // -------------------------------------------------------------------------

    /// Create a delivery note against a purchase order.
    #[instrument(skip(self, input), fields(purchase_order_id = %input.purchase_order_id))]
    pub async fn create_delivery_note(
        &self,
        input: &CreateDeliveryNote,
    ) -> Result<DeliveryNote, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_delivery_note"])
            .start_timer();

        self.get_purchase_order(input.purchase_order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Purchase order not found")))?;

        let delivery_note_id = Uuid::new_v4();
        let note = sqlx::query_as::<_, DeliveryNote>(
            r#"
            INSERT INTO delivery_notes (
                delivery_note_id, purchase_order_id, client_id, delivery_date, status,
                delivery_address
            )
            VALUES ($1, $2, $3, COALESCE($4, NOW()), 'in_progress', $5)
            RETURNING delivery_note_id, purchase_order_id, client_id, delivery_date, status,
                delivery_address
            "#,
        )
        .bind(delivery_note_id)
        .bind(input.purchase_order_id)
        .bind(input.client_id)
        .bind(input.delivery_date)
        .bind(&input.delivery_address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create delivery note: {}", e))
        })?;

        timer.observe_duration();

        info!(delivery_note_id = %note.delivery_note_id, "Delivery note created");

        Ok(note)
    }

    /// Get a delivery note by ID.
    #[instrument(skip(self), fields(delivery_note_id = %delivery_note_id))]
    pub async fn get_delivery_note(
        &self,
        delivery_note_id: Uuid,
    ) -> Result<Option<DeliveryNote>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_delivery_note"])
            .start_timer();

        let note = sqlx::query_as::<_, DeliveryNote>(
            "SELECT delivery_note_id, purchase_order_id, client_id, delivery_date, status, \
             delivery_address FROM delivery_notes WHERE delivery_note_id = $1",
        )
        .bind(delivery_note_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get delivery note: {}", e))
        })?;

        timer.observe_duration();

        Ok(note)
    }

    /// List delivery notes, optionally for one client.
    #[instrument(skip(self))]
    pub async fn list_delivery_notes(
        &self,
        client_id: Option<Uuid>,
    ) -> Result<Vec<DeliveryNote>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_delivery_notes"])
            .start_timer();

        let notes = sqlx::query_as::<_, DeliveryNote>(
            "SELECT delivery_note_id, purchase_order_id, client_id, delivery_date, status, \
             delivery_address FROM delivery_notes \
             WHERE ($1::uuid IS NULL OR client_id = $1) ORDER BY delivery_date DESC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list delivery notes: {}", e))
        })?;

        timer.observe_duration();

        Ok(notes)
    }

    /// Update a delivery note.
    #[instrument(skip(self, input), fields(delivery_note_id = %delivery_note_id))]
    pub async fn update_delivery_note(
        &self,
        delivery_note_id: Uuid,
        input: &UpdateDeliveryNote,
    ) -> Result<Option<DeliveryNote>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_delivery_note"])
            .start_timer();

        let note = sqlx::query_as::<_, DeliveryNote>(
            r#"
            UPDATE delivery_notes
            SET delivery_date = COALESCE($2, delivery_date),
                status = COALESCE($3, status),
                delivery_address = COALESCE($4, delivery_address)
            WHERE delivery_note_id = $1
            RETURNING delivery_note_id, purchase_order_id, client_id, delivery_date, status,
                delivery_address
            "#,
        )
        .bind(delivery_note_id)
        .bind(input.delivery_date)
        .bind(input.status.map(|s| s.as_str()))
        .bind(&input.delivery_address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update delivery note: {}", e))
        })?;

        timer.observe_duration();

        Ok(note)
    }

    /// Add a line to a delivery note. Total = quantity x unit price.
    #[instrument(skip(self, input), fields(delivery_note_id = %delivery_note_id))]
    pub async fn add_delivery_line(
        &self,
        delivery_note_id: Uuid,
        input: &CreateDeliveryLine,
    ) -> Result<DeliveryLine, AppError> {
        ensure_positive_quantity(input.quantity)?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["add_delivery_line"])
            .start_timer();

        self.get_delivery_note(delivery_note_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Delivery note not found")))?;

        let line_total = totals::line_total(input.quantity, input.unit_price);

        let delivery_line_id = Uuid::new_v4();
        let line = sqlx::query_as::<_, DeliveryLine>(
            r#"
            INSERT INTO delivery_lines (
                delivery_line_id, delivery_note_id, product_id, site_article_id,
                quantity, unit_price, line_total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING delivery_line_id, delivery_note_id, product_id, site_article_id,
                quantity, unit_price, line_total, created_utc
            "#,
        )
        .bind(delivery_line_id)
        .bind(delivery_note_id)
        .bind(input.product_id)
        .bind(input.site_article_id)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(line_total)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to add delivery line: {}", e))
        })?;

        timer.observe_duration();

        info!(delivery_line_id = %line.delivery_line_id, "Delivery line added");

        Ok(line)
    }

    /// Get the lines of a delivery note.
    #[instrument(skip(self), fields(delivery_note_id = %delivery_note_id))]
    pub async fn get_delivery_lines(
        &self,
        delivery_note_id: Uuid,
    ) -> Result<Vec<DeliveryLine>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_delivery_lines"])
            .start_timer();

        let lines = sqlx::query_as::<_, DeliveryLine>(
            "SELECT delivery_line_id, delivery_note_id, product_id, site_article_id, quantity, \
             unit_price, line_total, created_utc \
             FROM delivery_lines WHERE delivery_note_id = $1 ORDER BY created_utc",
        )
        .bind(delivery_note_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get delivery lines: {}", e))
        })?;

        timer.observe_duration();

        Ok(lines)
    }

    /// Update a delivery line, recomputing its total.
    #[instrument(skip(self, input), fields(delivery_line_id = %delivery_line_id))]
    pub async fn update_delivery_line(
        &self,
        delivery_note_id: Uuid,
        delivery_line_id: Uuid,
        input: &UpdateDeliveryLine,
    ) -> Result<Option<DeliveryLine>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_delivery_line"])
            .start_timer();

        let existing = sqlx::query_as::<_, DeliveryLine>(
            "SELECT delivery_line_id, delivery_note_id, product_id, site_article_id, quantity, \
             unit_price, line_total, created_utc \
             FROM delivery_lines WHERE delivery_note_id = $1 AND delivery_line_id = $2",
        )
        .bind(delivery_note_id)
        .bind(delivery_line_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get delivery line: {}", e))
        })?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let quantity = input.quantity.unwrap_or(existing.quantity);
        ensure_positive_quantity(quantity)?;
        let unit_price = input.unit_price.unwrap_or(existing.unit_price);
        let line_total = totals::line_total(quantity, unit_price);

        let line = sqlx::query_as::<_, DeliveryLine>(
            r#"
            UPDATE delivery_lines
            SET quantity = $3, unit_price = $4, line_total = $5
            WHERE delivery_note_id = $1 AND delivery_line_id = $2
            RETURNING delivery_line_id, delivery_note_id, product_id, site_article_id,
                quantity, unit_price, line_total, created_utc
            "#,
        )
        .bind(delivery_note_id)
        .bind(delivery_line_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(line_total)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update delivery line: {}", e))
        })?;

        timer.observe_duration();

        Ok(line)
    }

    /// Remove a delivery line.
    #[instrument(skip(self), fields(delivery_line_id = %delivery_line_id))]
    pub async fn remove_delivery_line(
        &self,
        delivery_note_id: Uuid,
        delivery_line_id: Uuid,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["remove_delivery_line"])
            .start_timer();

        let result = sqlx::query(
            "DELETE FROM delivery_lines WHERE delivery_note_id = $1 AND delivery_line_id = $2",
        )
        .bind(delivery_note_id)
        .bind(delivery_line_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to remove delivery line: {}", e))
        })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Invoice Operations
    // -------------------------------------------------------------------------

    /// Create an invoice against a purchase order. Tax and remaining
    /// balance are derived here; caller-supplied values never land.
    #[instrument(skip(self, input), fields(purchase_order_id = %input.purchase_order_id))]
    pub async fn create_invoice(&self, input: &CreateInvoice) -> Result<Invoice, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_invoice"])
            .start_timer();

        self.get_purchase_order(input.purchase_order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Purchase order not found")))?;

        let tax_amount = compute_tax(input.total, input.discount_amount);
        let remaining_balance = compute_remaining(input.total, input.partial_payment);
        let billing_status = input.billing_status.unwrap_or(BillingStatus::InProgress);

        let invoice_id = Uuid::new_v4();
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            INSERT INTO invoices (
                invoice_id, purchase_order_id, client_id, invoice_number, invoice_date,
                total, tax_amount, discount_amount, payment_status, payment_mode, due_date,
                payment_terms, delivery_address, shipping_status, partial_payment,
                remaining_balance, billing_status
            )
            VALUES ($1, $2, $3, $4, COALESCE($5, NOW()), $6, $7, $8, 'pending', $9, $10,
                $11, $12, 'pending', $13, $14, $15)
            RETURNING {INVOICE_COLUMNS}
            "#,
        ))
        .bind(invoice_id)
        .bind(input.purchase_order_id)
        .bind(input.client_id)
        .bind(&input.invoice_number)
        .bind(input.invoice_date)
        .bind(input.total)
        .bind(tax_amount)
        .bind(input.discount_amount)
        .bind(&input.payment_mode)
        .bind(input.due_date)
        .bind(&input.payment_terms)
        .bind(&input.delivery_address)
        .bind(input.partial_payment)
        .bind(remaining_balance)
        .bind(billing_status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "Invoice number '{}' already exists",
                    input.invoice_number
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create invoice: {}", e)),
        })?;

        timer.observe_duration();

        info!(
            invoice_id = %invoice.invoice_id,
            invoice_number = %invoice.invoice_number,
            "Invoice created"
        );

        Ok(invoice)
    }

    /// Get an invoice by ID.
    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<Option<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_invoice"])
            .start_timer();

        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_id = $1",
        ))
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e)))?;

        timer.observe_duration();

        Ok(invoice)
    }

    /// List invoices, optionally for one client.
    #[instrument(skip(self))]
    pub async fn list_invoices(&self, client_id: Option<Uuid>) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices \
             WHERE ($1::uuid IS NULL OR client_id = $1) ORDER BY invoice_date DESC",
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e)))?;

        timer.observe_duration();

        Ok(invoices)
    }

    /// Update an invoice. The merged record's tax and remaining balance
    /// are recomputed, overwriting anything the caller supplied.
    #[instrument(skip(self, input), fields(invoice_id = %invoice_id))]
    pub async fn update_invoice(
        &self,
        invoice_id: Uuid,
        input: &UpdateInvoice,
    ) -> Result<Option<Invoice>, AppError> {
        let Some(existing) = self.get_invoice(invoice_id).await? else {
            return Ok(None);
        };

        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_invoice"])
            .start_timer();

        let total = input.total.unwrap_or(existing.total);
        let discount_amount = input.discount_amount.unwrap_or(existing.discount_amount);
        let partial_payment = input.partial_payment.unwrap_or(existing.partial_payment);
        let tax_amount = compute_tax(total, discount_amount);
        let remaining_balance = compute_remaining(total, partial_payment);

        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET total = $2,
                tax_amount = $3,
                discount_amount = $4,
                payment_status = COALESCE($5, payment_status),
                payment_mode = COALESCE($6, payment_mode),
                due_date = COALESCE($7, due_date),
                paid_utc = COALESCE($8, paid_utc),
                payment_terms = COALESCE($9, payment_terms),
                delivery_address = COALESCE($10, delivery_address),
                shipping_status = COALESCE($11, shipping_status),
                partial_payment = $12,
                remaining_balance = $13,
                billing_status = COALESCE($14, billing_status)
            WHERE invoice_id = $1
            RETURNING {INVOICE_COLUMNS}
            "#,
        ))
        .bind(invoice_id)
        .bind(total)
        .bind(tax_amount)
        .bind(discount_amount)
        .bind(input.payment_status.map(|s| s.as_str()))
        .bind(&input.payment_mode)
        .bind(input.due_date)
        .bind(input.paid_utc)
        .bind(&input.payment_terms)
        .bind(&input.delivery_address)
        .bind(input.shipping_status.map(|s| s.as_str()))
        .bind(partial_payment)
        .bind(remaining_balance)
        .bind(input.billing_status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update invoice: {}", e)))?;

        timer.observe_duration();

        if let Some(ref inv) = invoice {
            info!(invoice_id = %inv.invoice_id, "Invoice updated");
        }

        Ok(invoice)
    }

    // -------------------------------------------------------------------------
    // Monthly Target Operations
    // -------------------------------------------------------------------------

    /// Create a monthly target. One row per (site, month).
    #[instrument(skip(self, input), fields(site_id = %input.site_id))]
    pub async fn create_monthly_target(
        &self,
        input: &CreateMonthlyTarget,
    ) -> Result<MonthlyTarget, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_monthly_target"])
            .start_timer();

        let target_id = Uuid::new_v4();
        let target = sqlx::query_as::<_, MonthlyTarget>(
            r#"
            INSERT INTO monthly_targets (target_id, site_id, month)
            VALUES ($1, $2, $3)
            RETURNING target_id, site_id, month
            "#,
        )
        .bind(target_id)
        .bind(input.site_id)
        .bind(input.month)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "A target for this site and month already exists"
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create target: {}", e)),
        })?;

        timer.observe_duration();

        Ok(target)
    }

    /// List the monthly targets of a site.
    #[instrument(skip(self), fields(site_id = %site_id))]
    pub async fn list_monthly_targets(
        &self,
        site_id: Uuid,
    ) -> Result<Vec<MonthlyTarget>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_monthly_targets"])
            .start_timer();

        let targets = sqlx::query_as::<_, MonthlyTarget>(
            "SELECT target_id, site_id, month FROM monthly_targets \
             WHERE site_id = $1 ORDER BY month",
        )
        .bind(site_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list targets: {}", e)))?;

        timer.observe_duration();

        Ok(targets)
    }
}
