use crate::models::{BlogPost, BlogPostCreate};
use sqlx::SqlitePool;
use tracing::info;

struct SeedPost {
    title: &'static str,
    slug: &'static str,
    excerpt: &'static str,
    content: &'static str,
    category: &'static str,
    image_url: &'static str,
}

const SAMPLE_POSTS: &[SeedPost] = &[
    SeedPost {
        title: "How to Convert PDF to Word Without Losing Formatting",
        slug: "convert-pdf-to-word-without-losing-formatting",
        excerpt: "Learn the best practices for converting PDF documents to Word while maintaining your original formatting and layout.",
        content: "<p>Converting PDF files to Word documents is one of the most common tasks for professionals, students, and businesses. However, many people struggle with maintaining the original formatting during the conversion process.</p>\
            <h2>Why Formatting Matters</h2>\
            <p>When you convert a PDF to Word, you want to preserve headings, fonts, images, tables, and overall layout. Poor conversion can result in hours of manual reformatting work.</p>\
            <h2>Using ConvertDocs</h2>\
            <p>ConvertDocs uses advanced conversion algorithms to maintain your document's formatting. Simply upload your PDF, and our tool will preserve headers, footers, images, and text styling.</p>",
        category: "PDF Tips",
        image_url: "https://images.pexels.com/photos/19238352/pexels-photo-19238352.jpeg",
    },
    SeedPost {
        title: "5 Ways to Reduce PDF File Size Without Losing Quality",
        slug: "reduce-pdf-file-size-without-losing-quality",
        excerpt: "Discover effective methods to compress your PDF files while maintaining document quality for easier sharing and storage.",
        content: "<p>Large PDF files can be problematic when trying to email documents or upload them to websites. Here are five proven methods to reduce PDF file size without compromising quality.</p>\
            <h2>1. Image Compression</h2>\
            <p>Images are often the largest components of PDF files. Compressing images while maintaining acceptable quality can significantly reduce file size.</p>\
            <h2>2. Remove Unnecessary Elements</h2>\
            <p>Delete unused bookmarks, annotations, or embedded fonts that aren't essential to your document.</p>\
            <p>With ConvertDocs Compress PDF tool, you can reduce file size by up to 70% while maintaining visual quality. Try it free today!</p>",
        category: "PDF Tips",
        image_url: "https://images.pexels.com/photos/7693736/pexels-photo-7693736.jpeg",
    },
    SeedPost {
        title: "Understanding OCR: How Text Extraction from Images Works",
        slug: "understanding-ocr-text-extraction-from-images",
        excerpt: "Learn how Optical Character Recognition (OCR) technology extracts text from images and scanned documents.",
        content: "<p>Optical Character Recognition (OCR) is a technology that converts different types of documents, such as scanned paper documents, PDF files, or images captured by a camera, into editable and searchable data.</p>\
            <h2>How OCR Works</h2>\
            <p>OCR technology analyzes the structure of a document image, breaks it down into elements like text blocks, lines, and characters, then compares these patterns against known character shapes.</p>\
            <p>Try our Image to Text OCR tool for free and unlock the text hidden in your images!</p>",
        category: "OCR Guides",
        image_url: "https://images.pexels.com/photos/5483248/pexels-photo-5483248.jpeg",
    },
    SeedPost {
        title: "PDF vs Word: When to Use Each Format",
        slug: "pdf-vs-word-when-to-use-each-format",
        excerpt: "Understand the key differences between PDF and Word formats and learn which one to use for different purposes.",
        content: "<p>Choosing between PDF and Word formats can impact how your documents are shared, edited, and preserved. Each format has unique advantages.</p>\
            <h2>When to Use PDF</h2>\
            <p>Final documents, cross-platform sharing, print-ready files and fillable forms all favor PDF, because the layout is fixed on every device.</p>\
            <h2>When to Use Word</h2>\
            <p>Collaborative editing, drafts, templates and editorial workflows with comments or tracked changes are better served by Word.</p>\
            <p>ConvertDocs makes it easy to convert between PDF and Word formats in seconds. Choose the format that fits your needs and convert whenever necessary!</p>",
        category: "File Conversion",
        image_url: "https://images.pexels.com/photos/18655049/pexels-photo-18655049.jpeg",
    },
    SeedPost {
        title: "How to Merge Multiple PDFs Into One Document",
        slug: "how-to-merge-multiple-pdfs-into-one-document",
        excerpt: "Step-by-step guide to combining multiple PDF files into a single document for easier management and sharing.",
        content: "<p>Combining multiple PDF files into one document is a common need for professionals organizing reports, students compiling assignments, or anyone managing digital documents.</p>\
            <h2>Step-by-Step Guide</h2>\
            <p>Decide the order of your PDFs before merging, upload them in that sequence, and download the combined document.</p>\
            <h2>Using ConvertDocs Merge PDF</h2>\
            <p>ConvertDocs makes PDF merging simple. Upload your files, they'll be combined in order, and you'll get one seamless PDF document. No software installation required!</p>",
        category: "How-To",
        image_url: "https://images.pexels.com/photos/7693736/pexels-photo-7693736.jpeg",
    },
];

/// Insert the sample posts that are not present yet. Safe to run on every
/// startup.
pub async fn seed_blog_posts(pool: &SqlitePool) -> anyhow::Result<()> {
    let mut created = 0;

    for sample in SAMPLE_POSTS {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blog_posts WHERE slug = ?")
            .bind(sample.slug)
            .fetch_one(pool)
            .await?;
        if exists > 0 {
            continue;
        }

        let post: BlogPost = BlogPostCreate {
            title: sample.title.to_string(),
            slug: sample.slug.to_string(),
            excerpt: sample.excerpt.to_string(),
            content: sample.content.to_string(),
            category: sample.category.to_string(),
            image_url: Some(sample.image_url.to_string()),
        }
        .into_post();

        sqlx::query(
            "INSERT INTO blog_posts \
             (id, title, slug, excerpt, content, category, author, image_url, published_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.category)
        .bind(&post.author)
        .bind(&post.image_url)
        .bind(post.published_at)
        .bind(post.updated_at)
        .execute(pool)
        .await?;
        created += 1;
    }

    if created > 0 {
        info!("🌱 Seeded {} blog post(s)", created);
    }
    Ok(())
}
