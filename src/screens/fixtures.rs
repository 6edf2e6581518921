use serde_json::{Value, json};

pub const DEPARTMENTS: [&str; 5] = ["Engineering", "Finance", "HR", "Operations", "Sales"];

pub fn users() -> Value {
    json!([
        {"id": 1, "name": "Amelia Hart", "email": "amelia.hart@crewboard.io", "role": "Admin", "status": "Active", "department": "Engineering"},
        {"id": 2, "name": "Benjamin Cole", "email": "ben.cole@crewboard.io", "role": "Manager", "status": "Active", "department": "Sales"},
        {"id": 3, "name": "Chloe Nguyen", "email": "chloe.nguyen@crewboard.io", "role": "Employee", "status": "Active", "department": "Finance"},
        {"id": 4, "name": "Daniel Okafor", "email": "daniel.okafor@crewboard.io", "role": "Employee", "status": "Inactive", "department": "Operations"},
        {"id": 5, "name": "Elena Petrova", "email": "elena.petrova@crewboard.io", "role": "Manager", "status": "Active", "department": "HR"},
        {"id": 6, "name": "Farid Haddad", "email": "farid.haddad@crewboard.io", "role": "Employee", "status": "Active", "department": "Engineering"},
        {"id": 7, "name": "Grace Liu", "email": "grace.liu@crewboard.io", "role": "Employee", "status": "Active", "department": "Sales"},
        {"id": 8, "name": "Hugo Martins", "email": "hugo.martins@crewboard.io", "role": "Admin", "status": "Inactive", "department": "Operations"},
        {"id": 9, "name": "Isla Brennan", "email": "isla.brennan@crewboard.io", "role": "Employee", "status": "Active", "department": "Finance"},
        {"id": 10, "name": "Jonas Weber", "email": "jonas.weber@crewboard.io", "role": "Manager", "status": "Active", "department": "Engineering"},
        {"id": 11, "name": "Keira Walsh", "email": "keira.walsh@crewboard.io", "role": "Employee", "status": "Inactive", "department": "HR"},
        {"id": 12, "name": "Leo Fischer", "email": "leo.fischer@crewboard.io", "role": "Employee", "status": "Active", "department": "Sales"}
    ])
}

pub fn roles() -> Value {
    json!([
        {"id": 1, "name": "Administrator", "description": "Full access to every screen and setting", "scope": "Global", "permissions": ["users:write", "roles:write", "tasks:write", "reports:write", "tickets:write", "settings:write"], "members": 2},
        {"id": 2, "name": "Manager", "description": "Manages team tasks and reviews reports", "scope": "Department", "permissions": ["tasks:write", "reports:read", "tickets:write", "directory:read"], "members": 3},
        {"id": 3, "name": "Employee", "description": "Works on assigned tasks and raises tickets", "scope": "Department", "permissions": ["tasks:read", "tickets:write", "directory:read"], "members": 7},
        {"id": 4, "name": "Auditor", "description": "Read-only access to reports", "scope": "Global", "permissions": ["reports:read"], "members": 0}
    ])
}

pub fn tasks() -> Value {
    json!([
        {"id": 1, "task": {"title": "Prepare Q3 budget review", "department": "Finance"}, "assignee": "Chloe Nguyen", "status": "In Progress", "priority": "High", "due_date": "2024-07-12"},
        {"id": 2, "task": {"title": "Migrate CI pipeline", "department": "Engineering"}, "assignee": "Farid Haddad", "status": "To Do", "priority": "Medium", "due_date": "2024-07-19"},
        {"id": 3, "task": {"title": "Onboard new sales hires", "department": "HR"}, "assignee": "Elena Petrova", "status": "Done", "priority": "Medium", "due_date": "2024-06-28"},
        {"id": 4, "task": {"title": "Renew vendor contracts", "department": "Operations"}, "assignee": "Daniel Okafor", "status": "To Do", "priority": "Low", "due_date": "2024-08-02"},
        {"id": 5, "task": {"title": "Update pricing deck", "department": "Sales"}, "assignee": "Grace Liu", "status": "In Progress", "priority": "High", "due_date": "2024-07-05"},
        {"id": 6, "task": {"title": "Patch login service", "department": "Engineering"}, "assignee": "Jonas Weber", "status": "Done", "priority": "High", "due_date": "2024-06-21"},
        {"id": 7, "task": {"title": "Reconcile expense claims", "department": "Finance"}, "assignee": "Isla Brennan", "status": "To Do", "priority": "Medium", "due_date": "2024-07-26"},
        {"id": 8, "task": {"title": "Plan warehouse inventory", "department": "Operations"}, "assignee": "Hugo Martins", "status": "In Progress", "priority": "Low", "due_date": "2024-08-09"},
        {"id": 9, "task": {"title": "Draft remote work policy", "department": "HR"}, "assignee": "Keira Walsh", "status": "To Do", "priority": "Medium", "due_date": "2024-07-30"},
        {"id": 10, "task": {"title": "Qualify enterprise leads", "department": "Sales"}, "assignee": "Leo Fischer", "status": "Done", "priority": "Medium", "due_date": "2024-06-30"},
        {"id": 11, "task": {"title": "Write API documentation", "department": "Engineering"}, "assignee": "Amelia Hart", "status": "To Do", "priority": "Low", "due_date": "2024-08-16"}
    ])
}

pub fn reports() -> Value {
    json!([
        {"id": 1, "title": "Quarterly revenue summary", "department": "Finance", "type": "Financial", "period": "2024-Q2", "owner": "Chloe Nguyen"},
        {"id": 2, "title": "Sprint velocity", "department": "Engineering", "type": "Performance", "period": "2024-Q2", "owner": "Jonas Weber"},
        {"id": 3, "title": "Headcount and attrition", "department": "HR", "type": "Operational", "period": "2024-Q1", "owner": "Elena Petrova"},
        {"id": 4, "title": "Pipeline conversion", "department": "Sales", "type": "Performance", "period": "2024-Q2", "owner": "Benjamin Cole"},
        {"id": 5, "title": "Logistics cost breakdown", "department": "Operations", "type": "Financial", "period": "2024-Q1", "owner": "Hugo Martins"},
        {"id": 6, "title": "Annual budget forecast", "department": "Finance", "type": "Financial", "period": "2023-Q4", "owner": "Isla Brennan"},
        {"id": 7, "title": "Incident response times", "department": "Engineering", "type": "Operational", "period": "2024-Q1", "owner": "Farid Haddad"}
    ])
}

pub fn employees() -> Value {
    json!([
        {"id": 1, "name": "Amelia Hart", "title": "Engineering Lead", "department": "Engineering", "email": "amelia.hart@crewboard.io", "phone": "+1 555 0101", "performance": 4.8},
        {"id": 2, "name": "Benjamin Cole", "title": "Sales Director", "department": "Sales", "email": "ben.cole@crewboard.io", "phone": "+1 555 0102", "performance": 4.2},
        {"id": 3, "name": "Chloe Nguyen", "title": "Financial Analyst", "department": "Finance", "email": "chloe.nguyen@crewboard.io", "phone": "+1 555 0103", "performance": 3.9},
        {"id": 4, "name": "Daniel Okafor", "title": "Operations Coordinator", "department": "Operations", "email": "daniel.okafor@crewboard.io", "phone": "+1 555 0104", "performance": 3.1},
        {"id": 5, "name": "Elena Petrova", "title": "HR Manager", "department": "HR", "email": "elena.petrova@crewboard.io", "phone": "+1 555 0105", "performance": 4.5},
        {"id": 6, "name": "Farid Haddad", "title": "Backend Engineer", "department": "Engineering", "email": "farid.haddad@crewboard.io", "phone": "+1 555 0106", "performance": 4.0},
        {"id": 7, "name": "Grace Liu", "title": "Account Executive", "department": "Sales", "email": "grace.liu@crewboard.io", "phone": "+1 555 0107", "performance": 3.7},
        {"id": 8, "name": "Isla Brennan", "title": "Accountant", "department": "Finance", "email": "isla.brennan@crewboard.io", "phone": "+1 555 0109", "performance": 4.1},
        {"id": 9, "name": "Jonas Weber", "title": "Platform Engineer", "department": "Engineering", "email": "jonas.weber@crewboard.io", "phone": "+1 555 0110", "performance": 4.6}
    ])
}

pub fn tickets() -> Value {
    json!([
        {"id": 1, "subject": "VPN disconnects every hour", "requester": "Grace Liu", "category": "Network", "priority": "High", "status": "Open"},
        {"id": 2, "subject": "Laptop battery swelling", "requester": "Daniel Okafor", "category": "Hardware", "priority": "Urgent", "status": "In Progress"},
        {"id": 3, "subject": "Reset password for payroll portal", "requester": "Isla Brennan", "category": "Access", "priority": "Medium", "status": "Resolved"},
        {"id": 4, "subject": "Request second monitor", "requester": "Farid Haddad", "category": "Hardware", "priority": "Low", "status": "Open"},
        {"id": 5, "subject": "Shared drive permissions", "requester": "Elena Petrova", "category": "Access", "priority": "Medium", "status": "Closed"},
        {"id": 6, "subject": "Email signature not updating", "requester": "Benjamin Cole", "category": "General", "priority": "Low", "status": "Open"},
        {"id": 7, "subject": "CRM export times out", "requester": "Leo Fischer", "category": "Software", "priority": "High", "status": "In Progress"},
        {"id": 8, "subject": "Badge reader at east entrance", "requester": "Hugo Martins", "category": "Facilities", "priority": "Medium", "status": "Open"}
    ])
}
