//! Employee repository for record lifecycle and aggregation queries

use anyhow::Result;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::models::{
    DashboardStats, DepartmentData, Employee, EmployeeListQuery, EmployeeStatus,
    NewEmployeeRequest, SalaryData, UpdateEmployeeRequest,
};

/// Sort fields accepted by the listing endpoint; anything else falls
/// back to the default
const SORTABLE_COLUMNS: &[&str] = &[
    "emp_code",
    "name",
    "email",
    "department",
    "role",
    "salary",
    "join_date",
    "phone",
    "address",
    "status",
    "created_at",
    "updated_at",
];

const EMPLOYEE_COLUMNS: &str = "id, emp_code, name, email, department, role, salary, join_date, \
     phone, address, photo, status, created_at, updated_at";

/// Employee repository
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Create a new employee repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new employee record
    ///
    /// The emp_code is derived from the total record count (active and
    /// inactive). Count and insert run in an immediate transaction:
    /// the write lock is taken before the count, so two racing creates
    /// serialize instead of deadlocking on a deferred lock upgrade.
    pub async fn create(&self, new: &NewEmployeeRequest) -> Result<Employee> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let inserted = Self::insert_next(&mut conn, new).await;
        if inserted.is_ok() {
            sqlx::query("COMMIT").execute(&mut *conn).await?;
        } else {
            let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
        }

        inserted
    }

    async fn insert_next(
        conn: &mut SqliteConnection,
        new: &NewEmployeeRequest,
    ) -> Result<Employee> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&mut *conn)
            .await?;
        let emp_code = format!("EMP{:05}", count + 1);

        let now = Utc::now();
        let employee = Employee {
            id: Uuid::new_v4().to_string(),
            emp_code,
            name: new.name.clone(),
            email: new.email.clone(),
            department: new.department.clone(),
            role: new.role.clone(),
            salary: new.salary,
            join_date: new.join_date.clone(),
            phone: new.phone.clone(),
            address: new.address.clone(),
            photo: new.photo.clone(),
            status: EmployeeStatus::Active,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO employees (id, emp_code, name, email, department, role, salary, \
             join_date, phone, address, photo, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&employee.id)
        .bind(&employee.emp_code)
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(&employee.department)
        .bind(&employee.role)
        .bind(employee.salary)
        .bind(&employee.join_date)
        .bind(&employee.phone)
        .bind(&employee.address)
        .bind(&employee.photo)
        .bind(employee.status)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(employee)
    }

    /// Find an employee by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Find an employee by email, across active and inactive records
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// List employees with pagination, sorting, and filtering
    pub async fn list(&self, query: &EmployeeListQuery) -> Result<Vec<Employee>> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).max(1);
        let offset = (page - 1) as i64 * limit as i64;

        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees"
        ));
        push_filters(&mut qb, query);

        let sort_by = query
            .sort_by
            .as_deref()
            .filter(|s| SORTABLE_COLUMNS.contains(s))
            .unwrap_or("name");
        let sort_dir = if query.sort_order.as_deref() == Some("desc") {
            "DESC"
        } else {
            "ASC"
        };
        // Secondary key keeps the sort stable in storage order
        qb.push(format!(" ORDER BY {sort_by} {sort_dir}, rowid ASC"));

        qb.push(" LIMIT ");
        qb.push_bind(limit as i64);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let employees = qb
            .build_query_as::<Employee>()
            .fetch_all(&self.pool)
            .await?;

        Ok(employees)
    }

    /// Count employees matching the same filters as `list`
    pub async fn count(&self, query: &EmployeeListQuery) -> Result<i64> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM employees");
        push_filters(&mut qb, query);

        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(count)
    }

    /// Apply a partial update; only supplied fields change, and
    /// updated_at is always stamped
    pub async fn update(&self, id: &str, update: &UpdateEmployeeRequest) -> Result<Option<Employee>> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE employees SET updated_at = ");
        qb.push_bind(Utc::now());

        if let Some(name) = &update.name {
            qb.push(", name = ");
            qb.push_bind(name);
        }
        if let Some(email) = &update.email {
            qb.push(", email = ");
            qb.push_bind(email);
        }
        if let Some(department) = &update.department {
            qb.push(", department = ");
            qb.push_bind(department);
        }
        if let Some(role) = &update.role {
            qb.push(", role = ");
            qb.push_bind(role);
        }
        if let Some(salary) = update.salary {
            qb.push(", salary = ");
            qb.push_bind(salary);
        }
        if let Some(join_date) = &update.join_date {
            qb.push(", join_date = ");
            qb.push_bind(join_date);
        }
        if let Some(phone) = &update.phone {
            qb.push(", phone = ");
            qb.push_bind(phone);
        }
        if let Some(address) = &update.address {
            qb.push(", address = ");
            qb.push_bind(address);
        }
        if let Some(photo) = &update.photo {
            qb.push(", photo = ");
            qb.push_bind(photo);
        }
        if let Some(status) = update.status {
            qb.push(", status = ");
            qb.push_bind(status);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);

        qb.build().execute(&self.pool).await?;

        self.find_by_id(id).await
    }

    /// Soft status transition; delete sets inactive, restore sets active
    pub async fn set_status(&self, id: &str, status: EmployeeStatus) -> Result<()> {
        sqlx::query("UPDATE employees SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Distinct department values across all records regardless of status
    pub async fn distinct_departments(&self) -> Result<Vec<String>> {
        let departments =
            sqlx::query_scalar("SELECT DISTINCT department FROM employees ORDER BY department")
                .fetch_all(&self.pool)
                .await?;

        Ok(departments)
    }

    /// Active employees in storage order, feeding the export pipeline
    pub async fn active_for_export(&self) -> Result<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE status = 'active' ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Headline dashboard counters
    ///
    /// The salary average spans all records, not just active ones, to
    /// match the aggregation scope of the department breakdowns.
    pub async fn stats(&self) -> Result<DashboardStats> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;

        let active: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE status = 'active'")
                .fetch_one(&self.pool)
                .await?;

        let department_count: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT department) FROM employees")
                .fetch_one(&self.pool)
                .await?;

        let average_salary: f64 =
            sqlx::query_scalar("SELECT COALESCE(ROUND(AVG(salary), 2), 0.0) FROM employees")
                .fetch_one(&self.pool)
                .await?;

        Ok(DashboardStats {
            total_employees: total,
            active_employees: active,
            department_count,
            average_salary,
        })
    }

    /// Employee count per department across all records
    pub async fn department_breakdown(&self) -> Result<Vec<DepartmentData>> {
        let breakdown = sqlx::query_as::<_, DepartmentData>(
            "SELECT department, COUNT(*) AS count FROM employees \
             GROUP BY department ORDER BY department",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(breakdown)
    }

    /// Average salary per department, rounded to 2 decimal places
    pub async fn salary_by_department(&self) -> Result<Vec<SalaryData>> {
        let salaries = sqlx::query_as::<_, SalaryData>(
            "SELECT department, ROUND(AVG(salary), 2) AS average_salary FROM employees \
             GROUP BY department ORDER BY department",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(salaries)
    }
}

/// Shared WHERE clause for listing and counting
///
/// Search matches case-insensitively against name, email, or emp_code
/// as a substring; department and status are exact matches combined
/// with AND. Empty parameters are treated as absent.
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &EmployeeListQuery) {
    let mut prefix = " WHERE ";

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.to_lowercase());
        qb.push(prefix);
        qb.push("(LOWER(name) LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR LOWER(email) LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR LOWER(emp_code) LIKE ");
        qb.push_bind(pattern);
        qb.push(")");
        prefix = " AND ";
    }

    if let Some(department) = query.department.as_deref().filter(|s| !s.is_empty()) {
        qb.push(prefix);
        qb.push("department = ");
        qb.push_bind(department.to_string());
        prefix = " AND ";
    }

    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        qb.push(prefix);
        qb.push("status = ");
        qb.push_bind(status.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::test_pool;
    use std::time::Duration;

    async fn test_repo() -> EmployeeRepository {
        EmployeeRepository::new(test_pool().await)
    }

    fn new_employee(name: &str, email: &str, department: &str, salary: f64) -> NewEmployeeRequest {
        NewEmployeeRequest {
            name: name.to_string(),
            email: email.to_string(),
            department: department.to_string(),
            role: "Engineer".to_string(),
            salary,
            join_date: "2024-01-15".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Main St".to_string(),
            photo: None,
        }
    }

    fn list_query() -> EmployeeListQuery {
        EmployeeListQuery::default()
    }

    #[tokio::test]
    async fn test_create_generates_sequential_codes() {
        let repo = test_repo().await;

        let first = repo
            .create(&new_employee("Alice", "alice@corp.test", "Eng", 100.0))
            .await
            .unwrap();
        let second = repo
            .create(&new_employee("Bob", "bob@corp.test", "Eng", 200.0))
            .await
            .unwrap();

        assert_eq!(first.emp_code, "EMP00001");
        assert_eq!(second.emp_code, "EMP00002");

        let fetched = repo.find_by_id(&first.id).await.unwrap().unwrap();
        assert!(
            fetched.emp_code.starts_with("EMP")
                && fetched.emp_code.len() == 8
                && fetched.emp_code[3..].chars().all(|c| c.is_ascii_digit())
        );
        assert_eq!(fetched.created_at, fetched.updated_at);
        assert_eq!(fetched.status, EmployeeStatus::Active);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_creates_serialize() {
        // A file-backed pool with several connections, so the two
        // creates genuinely contend for the write lock
        let path = std::env::temp_dir().join(format!("employees-{}.db", Uuid::new_v4()));
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&format!("sqlite://{}?mode=rwc", path.display()))
            .await
            .unwrap();
        crate::schema::init_schema(&pool).await.unwrap();
        let repo = EmployeeRepository::new(pool.clone());

        let first = {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.create(&new_employee("Alice", "alice@corp.test", "Eng", 100.0))
                    .await
            })
        };
        let second = {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.create(&new_employee("Bob", "bob@corp.test", "Eng", 200.0))
                    .await
            })
        };

        let a = first.await.unwrap().unwrap();
        let b = second.await.unwrap().unwrap();

        let mut codes = vec![a.emp_code, b.emp_code];
        codes.sort();
        assert_eq!(codes, vec!["EMP00001", "EMP00002"]);

        pool.close().await;
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_file(path.with_extension("db-wal"));
        let _ = std::fs::remove_file(path.with_extension("db-shm"));
    }

    #[tokio::test]
    async fn test_find_by_email_sees_inactive_records() {
        let repo = test_repo().await;
        let emp = repo
            .create(&new_employee("Alice", "alice@corp.test", "Eng", 100.0))
            .await
            .unwrap();

        repo.set_status(&emp.id, EmployeeStatus::Inactive)
            .await
            .unwrap();

        let found = repo.find_by_email("alice@corp.test").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_list_search_and_filters() {
        let repo = test_repo().await;
        repo.create(&new_employee("Alice Young", "alice@corp.test", "Eng", 100.0))
            .await
            .unwrap();
        repo.create(&new_employee("Bob Stone", "bob@corp.test", "Eng", 200.0))
            .await
            .unwrap();
        repo.create(&new_employee("Carla Reyes", "carla@corp.test", "Sales", 300.0))
            .await
            .unwrap();

        // Case-insensitive substring over name
        let result = repo
            .list(&EmployeeListQuery {
                search: Some("ALICE".to_string()),
                ..list_query()
            })
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Alice Young");

        // Search also matches emp_code
        let result = repo
            .list(&EmployeeListQuery {
                search: Some("emp00002".to_string()),
                ..list_query()
            })
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Bob Stone");

        // Department filter combined with search
        let result = repo
            .list(&EmployeeListQuery {
                search: Some("corp.test".to_string()),
                department: Some("Sales".to_string()),
                ..list_query()
            })
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].department, "Sales");

        let count = repo
            .count(&EmployeeListQuery {
                department: Some("Eng".to_string()),
                ..list_query()
            })
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_list_sorting_and_pagination() {
        let repo = test_repo().await;
        repo.create(&new_employee("Alice", "alice@corp.test", "Eng", 100.0))
            .await
            .unwrap();
        repo.create(&new_employee("Bob", "bob@corp.test", "Eng", 300.0))
            .await
            .unwrap();
        repo.create(&new_employee("Carla", "carla@corp.test", "Eng", 200.0))
            .await
            .unwrap();

        let result = repo
            .list(&EmployeeListQuery {
                sort_by: Some("salary".to_string()),
                sort_order: Some("desc".to_string()),
                ..list_query()
            })
            .await
            .unwrap();
        let salaries: Vec<f64> = result.iter().map(|e| e.salary).collect();
        assert_eq!(salaries, vec![300.0, 200.0, 100.0]);

        // Unknown sort field falls back to name
        let result = repo
            .list(&EmployeeListQuery {
                sort_by: Some("name; DROP TABLE employees".to_string()),
                ..list_query()
            })
            .await
            .unwrap();
        assert_eq!(result[0].name, "Alice");

        let page2 = repo
            .list(&EmployeeListQuery {
                page: Some(2),
                limit: Some(2),
                ..list_query()
            })
            .await
            .unwrap();
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0].name, "Carla");

        // Out-of-range paging parameters are clamped, not an error
        let clamped = repo
            .list(&EmployeeListQuery {
                page: Some(0),
                limit: Some(0),
                ..list_query()
            })
            .await
            .unwrap();
        assert_eq!(clamped.len(), 1);
    }

    #[tokio::test]
    async fn test_partial_update_touches_only_supplied_fields() {
        let repo = test_repo().await;
        let emp = repo
            .create(&new_employee("Alice", "alice@corp.test", "Eng", 100.0))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        let updated = repo
            .update(
                &emp.id,
                &UpdateEmployeeRequest {
                    salary: Some(5000.0),
                    ..UpdateEmployeeRequest::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.salary, 5000.0);
        assert_eq!(updated.name, "Alice");
        assert_eq!(updated.email, "alice@corp.test");
        assert_eq!(updated.department, "Eng");
        assert_eq!(updated.phone, "555-0100");
        assert_eq!(updated.created_at, emp.created_at);
        assert!(updated.updated_at > emp.updated_at);
    }

    #[tokio::test]
    async fn test_soft_delete_and_restore_visibility() {
        let repo = test_repo().await;
        let emp = repo
            .create(&new_employee("Alice", "alice@corp.test", "Eng", 100.0))
            .await
            .unwrap();

        repo.set_status(&emp.id, EmployeeStatus::Inactive)
            .await
            .unwrap();

        let active = repo
            .list(&EmployeeListQuery {
                status: Some("active".to_string()),
                ..list_query()
            })
            .await
            .unwrap();
        assert!(active.is_empty());

        let inactive = repo
            .list(&EmployeeListQuery {
                status: Some("inactive".to_string()),
                ..list_query()
            })
            .await
            .unwrap();
        assert_eq!(inactive.len(), 1);

        let unfiltered = repo.list(&list_query()).await.unwrap();
        assert_eq!(unfiltered.len(), 1);

        repo.set_status(&emp.id, EmployeeStatus::Active)
            .await
            .unwrap();
        let active = repo
            .list(&EmployeeListQuery {
                status: Some("active".to_string()),
                ..list_query()
            })
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn test_departments_span_all_statuses() {
        let repo = test_repo().await;
        let emp = repo
            .create(&new_employee("Alice", "alice@corp.test", "Eng", 100.0))
            .await
            .unwrap();
        repo.create(&new_employee("Carla", "carla@corp.test", "Sales", 300.0))
            .await
            .unwrap();
        repo.set_status(&emp.id, EmployeeStatus::Inactive)
            .await
            .unwrap();

        let departments = repo.distinct_departments().await.unwrap();
        assert_eq!(departments, vec!["Eng".to_string(), "Sales".to_string()]);
    }

    #[tokio::test]
    async fn test_dashboard_aggregates() {
        let repo = test_repo().await;
        repo.create(&new_employee("Alice", "alice@corp.test", "Eng", 100.0))
            .await
            .unwrap();
        repo.create(&new_employee("Bob", "bob@corp.test", "Eng", 200.0))
            .await
            .unwrap();
        repo.create(&new_employee("Carla", "carla@corp.test", "Sales", 300.0))
            .await
            .unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_employees, 3);
        assert_eq!(stats.active_employees, 3);
        assert_eq!(stats.department_count, 2);
        assert_eq!(stats.average_salary, 200.0);

        let breakdown = repo.department_breakdown().await.unwrap();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].department, "Eng");
        assert_eq!(breakdown[0].count, 2);
        assert_eq!(breakdown[1].department, "Sales");
        assert_eq!(breakdown[1].count, 1);

        let salaries = repo.salary_by_department().await.unwrap();
        assert_eq!(salaries[0].average_salary, 150.0);
        assert_eq!(salaries[1].average_salary, 300.0);
    }

    #[tokio::test]
    async fn test_dashboard_aggregates_include_inactive_records() {
        let repo = test_repo().await;
        let emp = repo
            .create(&new_employee("Alice", "alice@corp.test", "Eng", 100.0))
            .await
            .unwrap();
        repo.create(&new_employee("Bob", "bob@corp.test", "Eng", 300.0))
            .await
            .unwrap();
        repo.set_status(&emp.id, EmployeeStatus::Inactive)
            .await
            .unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_employees, 2);
        assert_eq!(stats.active_employees, 1);
        // Average still spans the inactive record
        assert_eq!(stats.average_salary, 200.0);
    }

    #[tokio::test]
    async fn test_stats_on_empty_record_set() {
        let repo = test_repo().await;

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_employees, 0);
        assert_eq!(stats.average_salary, 0.0);
    }

    #[tokio::test]
    async fn test_export_set_is_active_only() {
        let repo = test_repo().await;
        let emp = repo
            .create(&new_employee("Alice", "alice@corp.test", "Eng", 100.0))
            .await
            .unwrap();
        repo.create(&new_employee("Bob", "bob@corp.test", "Eng", 200.0))
            .await
            .unwrap();
        repo.set_status(&emp.id, EmployeeStatus::Inactive)
            .await
            .unwrap();

        let exported = repo.active_for_export().await.unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].name, "Bob");
    }
}
