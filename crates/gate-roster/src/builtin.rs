//! Compiled-in roster for the site.

use crate::AuthorityRecord;

struct StaticAuthority {
    id: u32,
    name: &'static str,
    designation: &'static str,
    department: &'static str,
    phone: &'static str,
    email: &'static str,
    purposes: &'static [&'static str],
}

impl StaticAuthority {
    fn to_record(&self) -> AuthorityRecord {
        AuthorityRecord {
            id: self.id,
            name: self.name.to_string(),
            designation: self.designation.to_string(),
            department: self.department.to_string(),
            phone: self.phone.to_string(),
            email: self.email.to_string(),
            purposes: self.purposes.iter().map(|p| p.to_string()).collect(),
        }
    }
}

const AUTHORITIES: [StaticAuthority; 12] = [
    StaticAuthority {
        id: 1,
        name: "Dr. Rajesh Kumar",
        designation: "Dean of Students",
        department: "Student Affairs",
        phone: "+91-9876543210",
        email: "rajesh.kumar@university.edu",
        purposes: &[
            "student meeting",
            "academic consultation",
            "student affairs",
            "education",
            "counseling",
        ],
    },
    StaticAuthority {
        id: 2,
        name: "Prof. Priya Sharma",
        designation: "Head of Security",
        department: "Security Department",
        phone: "+91-9876543211",
        email: "priya.sharma@university.edu",
        purposes: &["security", "emergency", "incident report", "safety", "patrol"],
    },
    StaticAuthority {
        id: 3,
        name: "Mr. Amit Patel",
        designation: "Maintenance Supervisor",
        department: "Facilities Management",
        phone: "+91-9876543212",
        email: "amit.patel@university.edu",
        purposes: &[
            "maintenance",
            "repair",
            "facility check",
            "infrastructure",
            "cleaning",
            "electrical work",
        ],
    },
    StaticAuthority {
        id: 4,
        name: "Dr. Sunita Singh",
        designation: "Medical Officer",
        department: "Health Center",
        phone: "+91-9876543213",
        email: "sunita.singh@university.edu",
        purposes: &[
            "medical",
            "health",
            "emergency",
            "patient visit",
            "medical consultation",
            "vaccination",
        ],
    },
    StaticAuthority {
        id: 5,
        name: "Mr. Vikram Gupta",
        designation: "Administrative Officer",
        department: "Administration",
        phone: "+91-9876543214",
        email: "vikram.gupta@university.edu",
        purposes: &[
            "administrative work",
            "documentation",
            "official meeting",
            "administration",
            "paperwork",
        ],
    },
    StaticAuthority {
        id: 6,
        name: "Prof. Neha Reddy",
        designation: "Research Coordinator",
        department: "Research & Development",
        phone: "+91-9876543215",
        email: "neha.reddy@university.edu",
        purposes: &[
            "research",
            "project meeting",
            "lab work",
            "research consultation",
            "experiment",
        ],
    },
    StaticAuthority {
        id: 7,
        name: "Mr. Rohit Jain",
        designation: "IT Support Manager",
        department: "Information Technology",
        phone: "+91-9876543216",
        email: "rohit.jain@university.edu",
        purposes: &[
            "technical support",
            "it maintenance",
            "computer repair",
            "network issue",
            "software installation",
        ],
    },
    StaticAuthority {
        id: 8,
        name: "Ms. Kavya Nair",
        designation: "Event Coordinator",
        department: "Cultural Activities",
        phone: "+91-9876543217",
        email: "kavya.nair@university.edu",
        purposes: &[
            "event",
            "cultural program",
            "function",
            "ceremony",
            "celebration",
            "workshop",
        ],
    },
    StaticAuthority {
        id: 9,
        name: "Dr. Manoj Agarwal",
        designation: "Finance Manager",
        department: "Finance & Accounts",
        phone: "+91-9876543218",
        email: "manoj.agarwal@university.edu",
        purposes: &[
            "finance",
            "payment",
            "accounting",
            "budget",
            "financial consultation",
        ],
    },
    StaticAuthority {
        id: 10,
        name: "Ms. Ritu Verma",
        designation: "HR Manager",
        department: "Human Resources",
        phone: "+91-9876543219",
        email: "ritu.verma@university.edu",
        purposes: &[
            "interview",
            "recruitment",
            "staff meeting",
            "training",
            "hr consultation",
        ],
    },
    StaticAuthority {
        id: 11,
        name: "Prof. Ashok Sharma",
        designation: "Library Head",
        department: "Central Library",
        phone: "+91-9876543220",
        email: "ashok.sharma@university.edu",
        purposes: &[
            "library",
            "book return",
            "research material",
            "study",
            "library consultation",
        ],
    },
    StaticAuthority {
        id: 12,
        name: "Mr. Deepak Singh",
        designation: "Transport Manager",
        department: "Transport Services",
        phone: "+91-9876543221",
        email: "deepak.singh@university.edu",
        purposes: &[
            "transport",
            "vehicle service",
            "bus maintenance",
            "driver meeting",
            "route planning",
        ],
    },
];

const HEAD_OF_ORGANIZATION: StaticAuthority = StaticAuthority {
    id: 999,
    name: "Dr. Anita Rao",
    designation: "Director General",
    department: "Administration",
    phone: "+91-9876543299",
    email: "director@university.edu",
    purposes: &["other"],
};

pub(crate) fn authorities() -> Vec<AuthorityRecord> {
    AUTHORITIES.iter().map(StaticAuthority::to_record).collect()
}

pub(crate) fn head_of_organization() -> AuthorityRecord {
    HEAD_OF_ORGANIZATION.to_record()
}
