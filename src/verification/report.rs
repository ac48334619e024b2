//! Text rendering for profiles and verdicts
//!
//! Everything here is plain template formatting. The rendered blocks become
//! task descriptions and expected outputs for the agent roles.

use super::documents::{ADMISSION_REQUIRED_DOCUMENTS, TRANSFER_CERTIFICATE};
use super::loan::{LOAN_REQUIRED_DOCUMENTS, MIN_LOAN_MARKS};
use crate::models::{DocumentStatus, DocumentVerdict, LoanVerdict, StudentRecord};

const FINANCE_OFFICE: &str = "Admissions & Finance Office";
const ADMISSIONS_COMMITTEE: &str = "Admissions Committee";

fn tick(ok: bool) -> &'static str {
    if ok {
        "✅"
    } else {
        "❌"
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn letter(name: &str, body: &str, signature: &str) -> String {
    format!("Dear {},\n\n{}\n\nSincerely,\n{}", name, body, signature)
}

/// Profile block followed by the student's query.
pub fn profile_context(record: &StudentRecord, query: &str) -> String {
    format!(
        "STUDENT PROFILE:\n\
         Name: {}\n\
         Age: {}\n\
         Course Applied: {}\n\
         Documents Submitted: {}\n\
         Loan Requested: ₹{}\n\
         Income Certificate: {}\n\
         Marks (10th): {}%\n\
         Marks (12th): {}%\n\
         \n\
         STUDENT QUERY:\n\
         {}\n",
        record.name,
        optional(record.age),
        record.course_applied,
        record.documents_submitted.join(", "),
        record.loan_requested,
        if record.income_certificate { "Yes" } else { "No" },
        optional(record.marks_10th),
        optional(record.marks_12th),
        query,
    )
}

fn status_lines(statuses: &[DocumentStatus]) -> String {
    statuses
        .iter()
        .map(|status| {
            format!(
                "- {} {}: {}",
                tick(status.submitted),
                status.name,
                if status.submitted { "Submitted" } else { "Missing" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

//
// ================= Loan =================
//

/// Requirements, marks and per-document status for the loan advisor.
pub fn loan_report(verdict: &LoanVerdict) -> String {
    format!(
        "LOAN ELIGIBILITY CHECK:\n\
         To qualify for a student loan, the following are required:\n\
         - Minimum 50% marks in 10th and 12th\n\
         - Submission of: {}\n\
         \n\
         STUDENT PERFORMANCE:\n\
         - 10th Marks: {}% {}\n\
         - 12th Marks: {}% {}\n\
         \n\
         DOCUMENT CHECK:\n\
         {}",
        LOAN_REQUIRED_DOCUMENTS.join(", "),
        verdict.marks_10th,
        tick(verdict.marks_10th >= MIN_LOAN_MARKS),
        verdict.marks_12th,
        tick(verdict.marks_12th >= MIN_LOAN_MARKS),
        status_lines(&verdict.doc_status),
    )
}

/// Final status line, plus one issue line per reason when not eligible.
pub fn loan_status(verdict: &LoanVerdict) -> String {
    if verdict.eligible {
        return "🎉 Loan Eligibility Status: Eligible for Student Loan".to_string();
    }

    let mut status = String::from("❌ Loan Eligibility Status: Not Eligible\n📌 Issues:");
    for reason in &verdict.reasons {
        status.push_str("\n- ");
        status.push_str(reason);
    }
    status
}

pub fn loan_closing(name: &str, eligible: bool) -> String {
    let body = if eligible {
        "Congratulations! Based on your academic performance and the documents you've submitted, \
         you are eligible for a student loan. Our finance team will contact you shortly with the \
         next steps in the process.\n\n\
         If you have any questions, feel free to reach out. We wish you all the best as you \
         continue your journey with us."
    } else {
        "Unfortunately, we are unable to approve your student loan application at this time due \
         to the reasons mentioned above. Please review the criteria and submit any missing \
         documents if applicable.\n\n\
         If you need support or clarification, our team is always here to assist you. We \
         encourage you to reapply once the issues are resolved."
    };
    letter(name, body, FINANCE_OFFICE)
}

/// Expected output handed to the loan advisor.
pub fn loan_expected_output(name: &str, verdict: &LoanVerdict) -> String {
    format!(
        "Loan Eligibility Summary:\n\
         - ✅ or ❌ for marks and documents\n\
         - 📌 Mention all issues if not eligible\n\
         - End with final loan eligibility status\n\
         \n\
         {}\n\n{}",
        loan_status(verdict),
        loan_closing(name, verdict.eligible),
    )
}

/// Reply sent instead of an evaluation when the income certificate is missing.
pub fn certificate_required_letter(name: &str) -> String {
    letter(
        name,
        "Thank you for your interest in applying for a student loan. Please note that the Income \
         Certificate is a mandatory requirement for processing any student loan application.\n\n\
         Unfortunately, we are unable to proceed until this document is submitted. Once you've \
         uploaded the Income Certificate, feel free to apply again and our team will be happy to \
         assist you.",
        FINANCE_OFFICE,
    )
}

//
// ================= Documents =================
//

/// Validation rules and the per-document checklist, appended to the profile context.
pub fn document_summary(verdict: &DocumentVerdict) -> String {
    let rules = ADMISSION_REQUIRED_DOCUMENTS
        .iter()
        .map(|name| format!("- {}", name))
        .collect::<Vec<_>>()
        .join("\n");

    let transfer = if verdict.transfer_certificate_present {
        format!("- ✅ {}: Submitted", TRANSFER_CERTIFICATE)
    } else {
        format!("- ⚠️ {}: Not Uploaded (not applicable)", TRANSFER_CERTIFICATE)
    };

    format!(
        "DOCUMENT VALIDATION RULES:\n\
         The following documents are mandatory to approve admission:\n\
         {}\n\
         \n\
         DOCUMENT CHECK SUMMARY:\n\
         {}\n\
         {}\n",
        rules,
        status_lines(&verdict.per_doc_status),
        transfer,
    )
}

pub fn document_status(verdict: &DocumentVerdict) -> String {
    if verdict.approved {
        "✅ Admission Status: Approved 🎉".to_string()
    } else {
        "❌ Admission Status: Not Approved\n\
         🔁 Action Required: Please upload missing documents to proceed"
            .to_string()
    }
}

pub fn document_closing(name: &str, approved: bool) -> String {
    let body = if approved {
        "Thank you for submitting your documents. We have reviewed them and found everything in \
         order. Your application is now ready for the next stage of admission processing.\n\n\
         Should anything further be required, we will reach out to you."
    } else {
        "Some required documents for your admission are still pending. Kindly refer to the \
         checklist above and submit the missing items as soon as possible to avoid delays in \
         your application.\n\n\
         For any help or guidance, please don't hesitate to contact our support team."
    };
    letter(name, body, ADMISSIONS_COMMITTEE)
}

/// Expected output handed to the document checker.
pub fn document_expected_output(name: &str, verdict: &DocumentVerdict) -> String {
    format!(
        "Document Verification Summary:\n\
         - ✅ or ❌ for required documents\n\
         - ⚠️ for Transfer Certificate if not uploaded\n\
         - End with final admission status message\n\
         \n\
         {}\n\n{}",
        document_status(verdict),
        document_closing(name, verdict.approved),
    )
}
