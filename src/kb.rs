//! The knowledge base: every topic the assistant can answer about, with
//! its matching keywords, the prose used for similarity scoring, the reply
//! template and suggested follow-up questions. Built once per process and
//! immutable afterwards; matching tokens are precomputed at build time.

use chrono::{Local, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::ConversationContext;
use crate::text::{self, NormalizeOptions, Token};

/// Reply text for a topic. Most topics are fixed strings; a few render
/// against the conversation state.
pub enum ResponseTemplate {
    Static(&'static str),
    Dynamic(fn(&ConversationContext) -> String),
}

impl ResponseTemplate {
    pub fn render(&self, ctx: &ConversationContext) -> String {
        match self {
            ResponseTemplate::Static(s) => (*s).to_string(),
            ResponseTemplate::Dynamic(f) => f(ctx),
        }
    }
}

pub struct KnowledgeEntry {
    pub topic: &'static str,
    pub keywords: &'static [&'static str],
    /// Extra prose included in the matching corpus but not in replies.
    pub text: &'static str,
    pub template: ResponseTemplate,
    pub follow_ups: &'static [&'static str],
    /// Normalized tokens over keywords + text + static reply.
    pub tokens: Vec<Token>,
}

pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn standard() -> &'static KnowledgeBase {
        static KB: Lazy<KnowledgeBase> = Lazy::new(build_standard);
        &KB
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn get(&self, topic: &str) -> Option<&KnowledgeEntry> {
        self.entries.iter().find(|e| e.topic == topic)
    }
}

fn entry(
    topic: &'static str,
    keywords: &'static [&'static str],
    text: &'static str,
    template: ResponseTemplate,
    follow_ups: &'static [&'static str],
) -> KnowledgeEntry {
    let mut corpus = keywords.join(" ");
    corpus.push(' ');
    corpus.push_str(text);
    if let ResponseTemplate::Static(reply) = &template {
        corpus.push(' ');
        corpus.push_str(reply);
    }
    let tokens = text::normalize(&corpus, NormalizeOptions::default());
    KnowledgeEntry { topic, keywords, text, template, follow_ups, tokens }
}

fn time_of_day() -> &'static str {
    let hour = Local::now().hour();
    if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}

fn greeting_reply(ctx: &ConversationContext) -> String {
    let tod = time_of_day();
    if let Some(name) = &ctx.user_name {
        format!("{tod}, {name}! Welcome back to KSP Yarns. How can I assist you today?")
    } else if ctx.message_count > 5 {
        format!("{tod}! Great to see you again. What can I help you with today?")
    } else {
        format!(
            "{tod}! Welcome to KSP Yarns. How can I assist you today with our yarn \
             products or services?"
        )
    }
}

fn general_reply(ctx: &ConversationContext) -> String {
    if ctx.recent_topics.iter().any(|t| t == "general") {
        "I'm doing well, thanks for asking! I'm an assistant programmed to help you with \
         information about KSP Yarns' products and services. Is there something specific \
         you'd like to know about our yarns?"
            .to_string()
    } else {
        "I'm KSP's assistant, designed to provide information about our yarns, services, \
         and answer any questions you might have. I'm functioning perfectly and ready to \
         assist you!"
            .to_string()
    }
}

fn build_standard() -> KnowledgeBase {
    let entries = vec![
        entry(
            "product",
            &[
                "yarn", "product", "collection", "buy", "purchase", "material", "catalog",
                "type", "variety", "stock", "available", "offer", "sell", "provide",
                "manufacture",
            ],
            "We offer a comprehensive range of high-quality yarns including recycled, OE \
             (Open-End), ring spun, and vortex yarns. Cotton yarns from Ne 4 to Ne 80 with \
             organic, recycled, combed and carded variants. Polyester yarns from Ne 10 to \
             Ne 60 including virgin, recycled (GRS certified) and textured polyester. \
             Blended yarns from Ne 6 to Ne 50 such as poly-cotton (65/35, 50/50, 60/40), \
             cotton-viscose and specialty blends. Specialty yarns including melange, slub, \
             fancy and core-spun yarns. Production technologies: ring spinning for premium \
             quality, open-end spinning for cost-effectiveness, vortex spinning for low \
             hairiness.",
            ResponseTemplate::Static(
                "We offer a comprehensive range of high-quality yarns including:\n\n\
                 - Cotton Yarns (Ne 4-80): organic, recycled, combed, and carded variants\n\
                 - Polyester Yarns (Ne 10-60): virgin, recycled (GRS certified), and textured\n\
                 - Blended Yarns (Ne 6-50): poly-cotton, cotton-viscose, and specialty blends\n\
                 - Specialty Yarns: melange, slub, fancy, and core-spun varieties\n\n\
                 We use advanced spinning technologies including Ring Spinning, Open-End \
                 Spinning, and Vortex Spinning to ensure superior quality. All our products \
                 are certified and meet international standards.",
            ),
            &[
                "What are your bestselling yarns?",
                "Tell me about your cotton yarns",
                "What certifications do your products have?",
            ],
        ),
        entry(
            "price",
            &[
                "price", "cost", "how much", "pricing", "discount", "affordable",
                "expensive", "budget", "quote", "offer", "deal",
            ],
            "",
            ResponseTemplate::Static(
                "Our pricing varies based on yarn type, quantity, and specifications. For \
                 detailed pricing, please contact our sales team. We offer competitive rates \
                 for bulk orders and regular customers may qualify for special discounts.",
            ),
            &[
                "Do you offer bulk discounts?",
                "What's your minimum order quantity?",
                "How can I get a price quote?",
            ],
        ),
        entry(
            "shipping",
            &[
                "ship", "delivery", "receive", "shipping", "time", "when", "arrive",
                "transit", "courier", "track", "package", "send",
            ],
            "",
            ResponseTemplate::Static(
                "We offer standard shipping (3-5 business days) and express shipping (1-2 \
                 business days). International shipping is also available for most locations. \
                 Once your order is processed, you'll receive a tracking number to monitor \
                 your shipment in real-time.",
            ),
            &[
                "Do you ship internationally?",
                "How can I track my order?",
                "What are your shipping rates?",
            ],
        ),
        entry(
            "return",
            &[
                "return", "refund", "cancel", "exchange", "money back", "policy", "damaged",
                "wrong", "unsatisfied", "quality issue",
            ],
            "",
            ResponseTemplate::Static(
                "We offer a 30-day return policy for unopened products. Please contact our \
                 customer service with your order number to initiate a return. For quality \
                 issues or damaged items, please provide photos for our quality assurance \
                 team to assess.",
            ),
            &[
                "How do I return a damaged product?",
                "Can I exchange my order?",
                "What's your refund process?",
            ],
        ),
        entry(
            "cancellation",
            &[
                "cancel", "cancle", "cancell", "canel", "cancellation", "stop order",
                "don't want", "oredr", "ordr",
            ],
            "To cancel an order, contact our customer service team as soon as possible. \
             Orders can typically be cancelled if they haven't entered the shipping process.",
            ResponseTemplate::Static(
                "To cancel your order, please contact our customer service team as soon as \
                 possible at kspyarnskarur@gmail.com or call +91 9994955782. Orders can \
                 typically be cancelled if they haven't entered the shipping process. Please \
                 provide your order number and contact information. If your order has \
                 already shipped, you may need to follow our return process instead.",
            ),
            &[
                "What's your return policy?",
                "How do I track my order status?",
                "Can I get a refund for cancelled orders?",
            ],
        ),
        entry(
            "contact",
            &[
                "contact", "email", "phone", "call", "support", "talk", "reach", "service",
                "help", "assistance", "representative", "chat",
            ],
            "Our main facility and office is located at 4-130 Gandhi Nagar, Karur \
             Sukkaliyur, Tamil Nadu, India. Business hours Monday to Saturday, 9 AM to 6 PM \
             IST.",
            ResponseTemplate::Static(
                "You can reach our team at kspyarnskarur@gmail.com or call us at \
                 +91 9994955782. Our offices are located at 4-130 Gandhi Nagar, Karur \
                 Sukkaliyur. Our customer service team is available Monday to Saturday from \
                 9 AM to 6 PM IST.",
            ),
            &[
                "What are your business hours?",
                "Do you have a customer support chat?",
                "How can I schedule a meeting?",
            ],
        ),
        entry(
            "company",
            &[
                "company", "about", "history", "background", "founded", "who are you", "ksp",
                "mission", "vision", "values", "team", "establishment",
                "tell me about your company",
            ],
            "Founded in 2005 in Karur, Tamil Nadu. Milestones: first manufacturing \
             facility 2008, ISO 9001 in 2012, recycled yarn line 2015, international \
             markets 2018, GOTS and GRS certifications 2020, new facility 2022. Mission: \
             premium quality yarns with sustainable practices. Values: quality, \
             sustainability, innovation, integrity, customer satisfaction.",
            ResponseTemplate::Static(
                "KSP Yarns was established in 2005 with a mission to provide premium quality \
                 yarns while embracing sustainable practices. We've grown from a small local \
                 supplier to an international yarn manufacturer known for quality, \
                 innovation, and environmental responsibility. Our team includes experienced \
                 textile engineers and quality control experts committed to excellence.",
            ),
            &[
                "Who founded KSP Yarns?",
                "What is your company's mission?",
                "How many employees do you have?",
            ],
        ),
        entry(
            "sustainability",
            &[
                "eco", "sustainable", "environment", "green", "recycled", "planet",
                "organic", "carbon", "footprint", "responsible", "ethical", "conservation",
                "eco-friendly", "renewable",
            ],
            "Solar-powered manufacturing facilities, 60% water recycling, zero-waste \
             manufacturing, organic and recycled raw material sourcing, energy-efficient \
             machinery. Goals: carbon neutrality by 2030, 100% renewable energy, zero \
             landfill waste by 2025, 50% water reduction by 2028.",
            ResponseTemplate::Static(
                "Sustainability is at the core of KSP Yarns' operations:\n\n\
                 Environmental initiatives:\n\
                 - Solar-powered manufacturing facilities\n\
                 - 60% water recycling and conservation\n\
                 - Zero-waste manufacturing processes\n\
                 - Organic and recycled raw materials\n\n\
                 Certifications: GOTS, GRS, ISO 14001, OEKO-TEX Standard 100.\n\n\
                 Future goals: carbon neutrality by 2030, 100% renewable energy, zero \
                 landfill waste by 2025, and 50% water consumption reduction by 2028. We're \
                 committed to sustainable textile manufacturing without compromising quality.",
            ),
            &[
                "Tell me about your recycled yarns",
                "What is GOTS certification?",
                "How do you reduce water usage?",
            ],
        ),
        entry(
            "specifications",
            &[
                "specification", "technical", "details", "count", "thickness", "strength",
                "quality", "parameters", "characteristics", "property", "standard",
            ],
            "",
            ResponseTemplate::Static(
                "Our yarns come in various specifications including different counts (Ne), \
                 twist levels, and strength parameters. For customized specifications, \
                 please contact our technical team. We can provide lab reports and quality \
                 certificates upon request.",
            ),
            &[
                "What yarn counts do you offer?",
                "Can you provide technical data sheets?",
                "What testing standards do you follow?",
            ],
        ),
        entry(
            "quality",
            &[
                "quality", "standard", "testing", "check", "control", "assurance",
                "inspection", "consistency", "defect", "qc", "qa", "test",
            ],
            "Multi-stage quality management: raw material inspection, in-process checks \
             during blowroom, carding, drawing, roving and spinning, final testing with \
             Uster technologies. Count accuracy plus or minus 2%, strength minimum 85% CSP, \
             elongation 5-8%, evenness U% under 12, color fastness grade 4-5. ASTM, ISO and \
             BS methods, 99.5% quality acceptance rate.",
            ResponseTemplate::Static(
                "Quality is our top priority at KSP Yarns:\n\n\
                 - Count accuracy: +/-2% tolerance\n\
                 - Strength: minimum 85% CSP\n\
                 - Evenness: U% < 12\n\
                 - Color fastness: grade 4-5\n\n\
                 We inspect raw materials, monitor every production stage, and test every \
                 batch with advanced Uster technology. We follow ASTM, ISO, and BS \
                 international standards, achieving a 99.5% quality acceptance rate. Every \
                 batch includes detailed test reports.",
            ),
            &[
                "What testing equipment do you use?",
                "Can you provide quality certificates?",
                "What are your quality standards?",
            ],
        ),
        entry(
            "samples",
            &[
                "sample", "test", "try", "before", "small", "quantity", "trial",
                "evaluation", "quality check",
            ],
            "",
            ResponseTemplate::Static(
                "We offer sample cards and small quantity samples for quality evaluation \
                 before bulk orders. Standard samples are available for a nominal fee which \
                 is credited towards your first order. For custom samples, please contact \
                 our sales team with your specific requirements and intended application.",
            ),
            &[
                "How can I order a sample?",
                "Is there a fee for samples?",
                "How long does sample delivery take?",
            ],
        ),
        entry(
            "colors",
            &[
                "color", "shade", "dye", "tone", "hue", "pantone", "match", "palette",
                "range", "options",
            ],
            "",
            ResponseTemplate::Static(
                "We offer yarns in a wide range of standard colors as well as custom color \
                 matching services. Our in-house dyeing facilities can match specific \
                 Pantone colors or your provided samples. We maintain color consistency \
                 across batches and offer color fastness guarantees for our dyed yarns.",
            ),
            &[
                "Can you match specific Pantone colors?",
                "What's your color consistency policy?",
                "Do you offer natural dyed yarns?",
            ],
        ),
        entry(
            "wholesale",
            &[
                "wholesale", "bulk", "large order", "business", "quantity", "distributor",
                "reseller", "commercial", "partner", "collaboration", "b2b",
            ],
            "",
            ResponseTemplate::Static(
                "We offer competitive wholesale pricing for bulk orders. Our minimum order \
                 quantity varies by product type. Please contact our business development \
                 team at kspyarnskarur@gmail.com with details of your requirements for a \
                 customized quote. We offer special terms for long-term business \
                 relationships.",
            ),
            &[
                "What are your wholesale terms?",
                "Do you offer partnership programs?",
                "Can I become a distributor?",
            ],
        ),
        entry(
            "order",
            &[
                "order", "status", "track", "placed", "processing", "confirm", "cancel",
                "modify", "change", "update", "timeline", "progress",
            ],
            "",
            ResponseTemplate::Static(
                "You can track your order status using the tracking number provided in your \
                 shipping confirmation email. If you need to modify an order, please contact \
                 customer service immediately as changes may only be possible before \
                 shipping. For order cancellations, please refer to our cancellation policy.",
            ),
            &[
                "How long does shipping take?",
                "Can I modify my order after placing it?",
                "What's your cancellation policy?",
            ],
        ),
        entry(
            "order_placement",
            &[
                "place order", "place an order", "buy", "purchase", "checkout", "ordering",
                "how to order", "make order", "ordering process", "how can i order",
                "how do i place", "want to buy", "want to purchase",
            ],
            "Orders can be placed by email to kspyarnskarur@gmail.com with yarn type, \
             count, quantity and delivery address, or by phone during business hours. For \
             bulk or custom orders we provide detailed quotations, samples and guidance. \
             Minimum order quantities vary by yarn type.",
            ResponseTemplate::Static(
                "Placing an order with KSP Yarns is simple and convenient:\n\n\
                 - Email: send requirements to kspyarnskarur@gmail.com\n\
                 - Phone: call +91 9994955782 (Mon-Sat, 9 AM-6 PM IST)\n\n\
                 For bulk orders we provide detailed quotations, sample cards for quality \
                 evaluation, custom specifications, and flexible payment terms for B2B \
                 clients. Our team will guide you through specifications, pricing, and \
                 delivery timelines. Minimum order quantities vary by product type.",
            ),
            &[
                "What payment methods do you accept?",
                "What's your minimum order quantity?",
                "Can I get samples before ordering?",
            ],
        ),
        entry(
            "payment",
            &[
                "payment", "pay", "method", "credit", "debit", "card", "bank", "transfer",
                "upi", "online", "transaction", "secure", "option",
            ],
            "",
            ResponseTemplate::Static(
                "We accept multiple payment methods including credit/debit cards, bank \
                 transfers, UPI, and international payment systems. All online transactions \
                 are secured with industry-standard encryption. For large orders, we also \
                 offer letter of credit and other B2B payment options. Contact our finance \
                 team for special payment arrangements.",
            ),
            &[],
        ),
        entry(
            "location",
            &[
                "location", "factory", "mill", "office", "address", "visit", "facility",
                "headquarter", "site", "place", "direction", "map",
            ],
            "",
            ResponseTemplate::Static(
                "Our main facility and office is located at 4-130 Gandhi Nagar, Karur \
                 Sukkaliyur, Tamil Nadu, India. We welcome factory visits by appointment. \
                 Please contact us at kspyarnskarur@gmail.com to schedule a visit. We also \
                 have distribution centers in major textile hubs across India and \
                 representative offices in select international locations.",
            ),
            &[],
        ),
        entry(
            "production",
            &[
                "production", "manufacturing", "make", "process", "facility", "machine",
                "technology", "equipment", "capacity",
            ],
            "",
            ResponseTemplate::Static(
                "Our state-of-the-art manufacturing facilities use modern technology for \
                 yarn production. Our processes include blowroom, carding, drawing, roving, \
                 ring spinning, open-end spinning, and post-spinning processes. We have a \
                 monthly production capacity of approximately 500 tons and employ strict \
                 quality control at every stage of production.",
            ),
            &[
                "What spinning technologies do you use?",
                "What's your production capacity?",
                "Can I visit your production facility?",
            ],
        ),
        entry(
            "applications",
            &[
                "application", "use", "suitable", "purpose", "ideal", "recommend",
                "best for", "intended", "usage",
            ],
            "",
            ResponseTemplate::Static(
                "Our yarns are suitable for various applications including apparel, home \
                 textiles, technical textiles, and industrial uses. We can recommend \
                 specific yarn types based on your end product requirements. Each product in \
                 our catalog includes recommended applications to help you choose the right \
                 yarn for your project.",
            ),
            &[
                "Which yarns are best for knitting?",
                "Do you have yarns for technical textiles?",
                "What yarns do you recommend for sportswear?",
            ],
        ),
        entry(
            "certification",
            &[
                "certif", "standard", "quality", "iso", "gots", "grs", "oeko-tex",
                "compliance", "test", "audit", "approval", "regulation", "authority",
                "verified",
            ],
            "GOTS for organic yarns, GRS for recycled content, OEKO-TEX Standard 100 for \
             harmful substances testing, ISO 9001 quality management, ISO 14001 \
             environmental management.",
            ResponseTemplate::Static(
                "Our yarns meet international quality standards and are certified by \
                 organizations like OEKO-TEX, GOTS, and GRS for our organic and recycled \
                 products. We maintain ISO 9001 for quality management and ISO 14001 for \
                 environmental management systems. All our certificates are available upon \
                 request.",
            ),
            &[],
        ),
        entry(
            "custom",
            &[
                "custom", "personalize", "specific", "special", "unique", "tailor",
                "bespoke", "design", "requirement", "particular", "exclusive",
            ],
            "",
            ResponseTemplate::Static(
                "We offer custom yarn development services tailored to your specific \
                 requirements. This includes customized blends, counts, colors, and \
                 finishing options. Custom orders typically require a minimum quantity and \
                 development time. Please contact our product development team with your \
                 specifications, and we'll work with you to create the perfect yarn for \
                 your needs.",
            ),
            &[],
        ),
        entry(
            "cotton_yarns",
            &["cotton", "organic cotton", "recycled cotton", "combed cotton", "carded cotton"],
            "Cotton yarns from Ne 4 to Ne 80: organic, recycled, combed and carded \
             variants, suitable for apparel, home textiles and industrial applications. \
             GOTS certified organic cotton available.",
            ResponseTemplate::Static(
                "Our cotton yarn range includes organic, recycled, combed, and carded \
                 variants from Ne 4 to Ne 80. These are perfect for apparel, home textiles, \
                 and various industrial applications. Our cotton yarns are known for their \
                 consistency, strength, and excellent dyeing properties. We also offer GOTS \
                 certified organic cotton yarns for eco-conscious projects.",
            ),
            &[
                "What's the difference between combed and carded cotton?",
                "Are your organic cotton yarns certified?",
                "What are the most popular cotton yarn counts?",
            ],
        ),
        entry(
            "polyester_yarns",
            &["polyester", "virgin polyester", "recycled polyester", "textured polyester"],
            "Polyester yarns from Ne 10 to Ne 60: virgin, recycled (GRS certified) and \
             textured options, ideal for technical textiles, sportswear and industrial \
             fabrics.",
            ResponseTemplate::Static(
                "We offer virgin polyester, recycled polyester, and textured polyester \
                 yarns in counts from Ne 10 to Ne 60. These are perfect for technical \
                 textiles, sportswear, and industrial applications. Our recycled polyester \
                 yarns carry GRS certification and provide excellent strength, abrasion \
                 resistance, and colorfastness while reducing environmental impact.",
            ),
            &[
                "What are the benefits of recycled polyester?",
                "How does textured polyester differ from regular polyester?",
                "What applications are polyester yarns best suited for?",
            ],
        ),
        entry(
            "blended_yarns",
            &["blend", "blended", "poly-cotton", "cotton-viscose", "specialty blend"],
            "Blended yarns from Ne 6 to Ne 50: poly-cotton, cotton-viscose and specialty \
             blends. Common ratios 65/35, 50/50 and 60/40 polyester/cotton.",
            ResponseTemplate::Static(
                "We manufacture various blended yarns including poly-cotton, cotton-viscose, \
                 and specialty blends in counts from Ne 6 to Ne 50. Our blends combine the \
                 strengths of different fibers - for example, our poly-cotton blends offer \
                 the comfort of cotton with the durability of polyester. Common blend ratios \
                 include 65/35, 50/50, and 60/40 polyester/cotton, perfect for apparel and \
                 home textiles.",
            ),
            &[
                "What are the advantages of blended yarns?",
                "What's your most popular blend ratio?",
                "Can you create custom blends?",
            ],
        ),
        entry(
            "specialty_yarns",
            &["specialty", "melange", "slub", "fancy", "core-spun"],
            "Specialty yarns for fashion apparel and premium textiles: melange for \
             heathered effects, slub for texture, fancy for visual interest, core-spun for \
             performance.",
            ResponseTemplate::Static(
                "Our specialty yarns include melange, slub, fancy, and core-spun varieties \
                 designed for fashion-forward applications. Melange yarns create heathered \
                 effects, slub yarns add texture, fancy yarns provide unique visual \
                 interest, and core-spun yarns offer special performance characteristics. \
                 These specialty products are perfect for premium fashion apparel and \
                 distinctive textile products.",
            ),
            &[
                "How are melange yarns different from regular yarns?",
                "What effects can I achieve with slub yarns?",
                "Do you offer custom specialty yarn development?",
            ],
        ),
        entry(
            "spinning_technologies",
            &[
                "spinning", "technology", "ring spinning", "open-end", "oe spinning",
                "vortex spinning", "manufacturing process",
            ],
            "Ring spinning produces high-quality yarns with excellent strength and \
             softness. Open-end spinning offers cost-effective production for coarser \
             counts. Vortex spinning creates yarns with low hairiness and good abrasion \
             resistance.",
            ResponseTemplate::Static(
                "We utilize three primary spinning technologies: Ring Spinning produces \
                 premium yarns with excellent strength and softness, ideal for fine fabrics. \
                 Open-End (OE) Spinning is cost-effective for medium to coarse counts with \
                 good uniformity. Vortex Spinning creates yarns with minimal hairiness and \
                 superior abrasion resistance, perfect for performance fabrics. Each \
                 technology offers distinct advantages for different end applications.",
            ),
            &[
                "Which spinning method produces the strongest yarns?",
                "What count ranges can you produce with each technology?",
                "How do I choose the right spinning method for my project?",
            ],
        ),
        entry(
            "greeting",
            &[
                "hi", "hello", "hey", "greetings", "good morning", "good afternoon",
                "good evening", "howdy", "sup", "yo", "hiya",
            ],
            "",
            ResponseTemplate::Dynamic(greeting_reply),
            &[
                "What products do you offer?",
                "Can you tell me about your company?",
                "How can I place an order?",
            ],
        ),
        entry(
            "thanks",
            &["thank", "thanks", "appreciate", "grateful", "helpful"],
            "",
            ResponseTemplate::Static(
                "You're welcome! I'm happy I could help. Is there anything else you'd like \
                 to know about our yarns or services?",
            ),
            &[
                "Tell me about your sustainability practices",
                "What are your bestselling products?",
                "How can I contact your team?",
            ],
        ),
        entry(
            "goodbye",
            &["bye", "goodbye", "see you", "farewell", "end"],
            "",
            ResponseTemplate::Static(
                "Thank you for chatting with the KSP Yarns assistant. Feel free to return \
                 anytime you have questions. Have a great day!",
            ),
            &[
                "Before I go, how can I place an order?",
                "Can I get a product catalog?",
                "What are your contact details?",
            ],
        ),
        entry(
            "general",
            &[
                "how are you", "what's up", "how's it going", "whats happening",
                "how do you work", "who are you",
            ],
            "",
            ResponseTemplate::Dynamic(general_reply),
            &[
                "Tell me about your company",
                "What products do you specialize in?",
                "How can you help me today?",
            ],
        ),
        entry(
            "help",
            &[
                "help", "assist", "support", "guide", "explain", "show me", "how to use",
                "what can you do",
            ],
            "",
            ResponseTemplate::Static(
                "I can help you with information about our products, ordering process, \
                 shipping details, company information, and more. You can ask me specific \
                 questions, and I'll do my best to assist you. You can also click on the \
                 suggested questions below for quick answers.",
            ),
            &[
                "What products do you offer?",
                "How do I place an order?",
                "Tell me about your yarn quality",
            ],
        ),
        entry(
            "name",
            &["your name", "who are you", "what are you called", "what should i call you"],
            "",
            ResponseTemplate::Static(
                "I'm KSP's assistant, designed to help you with information about our yarns \
                 and services. You can think of me as your personal guide to everything KSP \
                 Yarns offers. What would you like to know?",
            ),
            &[
                "What can you help me with?",
                "Tell me about KSP Yarns",
                "What products do you offer?",
            ],
        ),
    ];

    KnowledgeBase { entries }
}

// ---------------------------------------------------------------------------
// Product comparisons

struct ComparisonProfile {
    key: &'static str,
    label: &'static str,
    strengths: &'static str,
    best_for: &'static str,
}

const COMPARISON_PROFILES: &[ComparisonProfile] = &[
    ComparisonProfile {
        key: "cotton",
        label: "Cotton yarns",
        strengths: "natural feel, breathability, excellent dye uptake, biodegradable",
        best_for: "apparel, home textiles, and anything worn next to the skin",
    },
    ComparisonProfile {
        key: "polyester",
        label: "Polyester yarns",
        strengths: "high strength, abrasion resistance, colorfastness, low moisture uptake",
        best_for: "sportswear, technical textiles, and industrial fabrics",
    },
    ComparisonProfile {
        key: "ring",
        label: "Ring-spun yarns",
        strengths: "superior strength and softness, fine counts, smooth surface",
        best_for: "premium fine fabrics and high-end apparel",
    },
    ComparisonProfile {
        key: "openend",
        label: "Open-end yarns",
        strengths: "cost-effective production, good uniformity in medium to coarse counts",
        best_for: "denim, towels, and budget-conscious bulk applications",
    },
    ComparisonProfile {
        key: "organic",
        label: "Organic cotton yarns",
        strengths: "GOTS certified, grown without synthetic pesticides, fully traceable",
        best_for: "eco-labelled apparel and baby textiles",
    },
    ComparisonProfile {
        key: "recycled",
        label: "Recycled yarns",
        strengths: "GRS certified, lowest resource footprint, diverts waste from landfill",
        best_for: "brands with circular-economy targets and recycled-content claims",
    },
];

static COMPARISON_PATTERNS: Lazy<Vec<(Regex, [&'static str; 2])>> = Lazy::new(|| {
    [
        (r"(?i)\b(cotton)\b.*\b(polyester|poly)\b", ["cotton", "polyester"]),
        (r"(?i)\b(polyester|poly)\b.*\b(cotton)\b", ["cotton", "polyester"]),
        (r"(?i)\b(ring)\s*(spun|spinning)?\b.*\b(open\s*end|oe)\b", ["ring", "openend"]),
        (r"(?i)\b(open\s*end|oe)\b.*\b(ring)\s*(spun|spinning)?\b", ["ring", "openend"]),
        (r"(?i)\b(organic)\b.*\b(recycled)\b", ["organic", "recycled"]),
        (r"(?i)\b(recycled)\b.*\b(organic)\b", ["organic", "recycled"]),
    ]
    .iter()
    .map(|(pattern, items)| (Regex::new(pattern).expect("static comparison pattern"), *items))
    .collect()
});

/// Checks the text against the known comparison pairs. The pair is returned
/// in canonical order regardless of how the user phrased it.
pub fn detect_comparison(text: &str) -> Option<(&'static str, &'static str)> {
    COMPARISON_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, items)| (items[0], items[1]))
}

fn profile(key: &str) -> Option<&'static ComparisonProfile> {
    COMPARISON_PROFILES.iter().find(|p| p.key == key)
}

/// Renders a side-by-side comparison with a closing recommendation.
pub fn comparison_response(a: &str, b: &str) -> Option<String> {
    let pa = profile(a)?;
    let pb = profile(b)?;
    Some(format!(
        "Here's how {a_label} and {b_label} compare:\n\n\
         {a_label}: {a_strengths}. Best for {a_best}.\n\n\
         {b_label}: {b_strengths}. Best for {b_best}.\n\n\
         The right choice depends on your end product - tell me what you're making and \
         I can recommend one, or we can send samples of both.",
        a_label = pa.label,
        a_strengths = pa.strengths,
        a_best = pa.best_for,
        b_label = pb.label,
        b_strengths = pb.strengths,
        b_best = pb.best_for,
    ))
}

/// Suggested questions offered alongside a comparison answer.
pub const COMPARISON_FOLLOW_UPS: &[&str] = &[
    "Which yarn do you recommend for my project?",
    "Can I get samples of both?",
    "What are the prices for these yarns?",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_kb_has_the_expected_topics() {
        let kb = KnowledgeBase::standard();
        for topic in [
            "product", "price", "shipping", "return", "cancellation", "contact",
            "sustainability", "quality", "greeting", "goodbye", "thanks", "general",
            "cotton_yarns", "polyester_yarns", "spinning_technologies",
        ] {
            assert!(kb.get(topic).is_some(), "missing topic {topic}");
        }
    }

    #[test]
    fn every_entry_has_precomputed_tokens() {
        for e in KnowledgeBase::standard().entries() {
            assert!(!e.tokens.is_empty(), "no tokens for {}", e.topic);
        }
    }

    #[test]
    fn greeting_personalizes_for_known_users() {
        let kb = KnowledgeBase::standard();
        let mut ctx = ConversationContext::new();
        ctx.user_name = Some("Priya".into());
        let reply = kb.get("greeting").unwrap().template.render(&ctx);
        assert!(reply.contains("Priya"));
    }

    #[test]
    fn general_reply_varies_on_repeat() {
        let kb = KnowledgeBase::standard();
        let fresh = kb.get("general").unwrap().template.render(&ConversationContext::new());
        let mut ctx = ConversationContext::new();
        ctx.recent_topics.push("general".into());
        let repeat = kb.get("general").unwrap().template.render(&ctx);
        assert_ne!(fresh, repeat);
    }

    #[test]
    fn comparison_detection_is_order_insensitive() {
        assert_eq!(
            detect_comparison("what's better, cotton or polyester?"),
            Some(("cotton", "polyester"))
        );
        assert_eq!(
            detect_comparison("polyester vs cotton for sportswear"),
            Some(("cotton", "polyester"))
        );
        assert_eq!(
            detect_comparison("ring spun versus open end"),
            Some(("ring", "openend"))
        );
        assert_eq!(detect_comparison("tell me about cotton"), None);
    }

    #[test]
    fn comparison_response_names_both_sides() {
        let text = comparison_response("organic", "recycled").unwrap();
        assert!(text.contains("Organic cotton yarns"));
        assert!(text.contains("Recycled yarns"));
        assert!(comparison_response("cotton", "nylon").is_none());
    }
}
